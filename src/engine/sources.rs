use itertools::Itertools;
use std::fmt::{Display, Formatter};
use tracing::debug;
use url::Url;

const SOURCE_DELIMITER: char = ',';
/// Shown in place of a domain when the URL can't be parsed
pub const GENERIC_SOURCE_NAME: &str = "Fuente";

#[derive(strum::IntoStaticStr, Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum SourceKind {
    Twitter,
    Facebook,
    Instagram,
    Youtube,
    Linkedin,
    Gov,
    News,
    Generic,
}

/// Checked in order, first match wins.
/// A needle with a dot matches the domain or any subdomain of it,
/// otherwise it has to equal one of the host's labels.
const KNOWN_PROVIDERS: &[(&str, SourceKind)] = &[
    ("twitter", SourceKind::Twitter),
    ("x.com", SourceKind::Twitter),
    ("facebook", SourceKind::Facebook),
    ("fb.com", SourceKind::Facebook),
    ("instagram", SourceKind::Instagram),
    ("youtube", SourceKind::Youtube),
    ("youtu.be", SourceKind::Youtube),
    ("linkedin", SourceKind::Linkedin),
    ("gov", SourceKind::Gov),
    ("gob", SourceKind::Gov),
    ("clarin", SourceKind::News),
    ("lanacion", SourceKind::News),
    ("infobae", SourceKind::News),
    ("pagina12", SourceKind::News),
    ("prensaobrera", SourceKind::News),
    ("mundogremial", SourceKind::News),
    ("mariapress", SourceKind::News),
    ("laizquierdadiario", SourceKind::News),
    ("iprofesional", SourceKind::News),
    ("anred", SourceKind::News),
    ("redeco", SourceKind::News),
    ("elciudadanoweb", SourceKind::News),
    ("11noticias", SourceKind::News),
    ("conclusion", SourceKind::News),
    ("infonoroeste", SourceKind::News),
    ("inforegion", SourceKind::News),
    ("datagremial", SourceKind::News),
];

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SourceLink {
    pub url: String,
    /// Host without `www.`, or [GENERIC_SOURCE_NAME]
    pub domain: String,
    pub kind: SourceKind,
}

impl SourceLink {
    pub fn parse(url: &str) -> Self {
        match Url::parse(url).ok().and_then(|parsed| parsed.host_str().map(str::to_lowercase)) {
            Some(host) => {
                let domain = host.strip_prefix("www.").unwrap_or(&host).to_string();

                Self {
                    url: url.to_string(),
                    kind: kind_of(&domain),
                    domain,
                }
            }
            None => {
                debug!("Could not get a host out of '{}'", url);

                Self {
                    url: url.to_string(),
                    domain: GENERIC_SOURCE_NAME.to_string(),
                    kind: SourceKind::Generic,
                }
            }
        }
    }
}

impl Display for SourceLink {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let kind: &'static str = self.kind.into();

        write!(f, "{} [{}]", self.domain, kind)
    }
}

/// Splits a `fuente` field into its distinct links, keeping their order
pub fn parse_sources(sources: Option<&str>) -> Vec<SourceLink> {
    sources
        .unwrap_or_default()
        .split(SOURCE_DELIMITER)
        .map(str::trim)
        .filter(|source| !source.is_empty())
        .unique()
        .map(SourceLink::parse)
        .collect()
}

pub fn kind_of(domain: &str) -> SourceKind {
    KNOWN_PROVIDERS
        .iter()
        .find(|(needle, _)| host_matches(domain, needle))
        .map(|(_, kind)| *kind)
        .unwrap_or(SourceKind::Generic)
}

fn host_matches(host: &str, needle: &str) -> bool {
    if needle.contains('.') {
        host == needle || host.ends_with(&format!(".{needle}"))
    } else {
        host.split('.').any(|label| label == needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn should_parse_each_source_even_when_one_is_broken() {
        let sources = parse_sources(Some("https://twitter.com/x, not-a-url, https://gob.ar/y"));

        assert_eq!(sources.len(), 3);
        assert_eq!(sources[0].kind, SourceKind::Twitter);
        assert_eq!(sources[0].domain, "twitter.com");
        assert_eq!(sources[1].kind, SourceKind::Generic);
        assert_eq!(sources[1].domain, GENERIC_SOURCE_NAME);
        assert_eq!(sources[1].url, "not-a-url");
        assert_eq!(sources[2].kind, SourceKind::Gov);
    }

    #[test_log::test]
    fn should_drop_blanks_and_repeated_links() {
        let sources = parse_sources(Some(
            " https://www.infobae.com/a ,, https://www.infobae.com/a,https://www.infobae.com/b ,",
        ));

        assert_eq!(
            sources.iter().map(|source| source.url.as_str()).collect::<Vec<_>>(),
            vec!["https://www.infobae.com/a", "https://www.infobae.com/b"]
        );
    }

    #[test_log::test]
    fn when_missing_should_have_no_sources() {
        assert!(parse_sources(None).is_empty());
        assert!(parse_sources(Some("  ")).is_empty());
    }

    #[test_log::test]
    fn should_strip_www_from_domain() {
        let source = SourceLink::parse("https://www.Pagina12.com.ar/secciones/el-pais");

        assert_eq!(source.domain, "pagina12.com.ar");
        assert_eq!(source.kind, SourceKind::News);
    }

    #[test_log::test]
    fn should_recognize_known_providers() {
        for (url, kind) in [
            ("https://x.com/someone/status/1", SourceKind::Twitter),
            ("https://mobile.twitter.com/ate", SourceKind::Twitter),
            ("https://m.facebook.com/cta", SourceKind::Facebook),
            ("https://www.instagram.com/p/abc", SourceKind::Instagram),
            ("https://youtu.be/abc", SourceKind::Youtube),
            ("https://www.linkedin.com/in/x", SourceKind::Linkedin),
            ("https://www.argentina.gob.ar/noticias", SourceKind::Gov),
            ("https://www.usa.gov/", SourceKind::Gov),
            ("https://www.clarin.com/politica", SourceKind::News),
            ("https://www.laizquierdadiario.com/nota", SourceKind::News),
            ("https://ejemplo.com.ar/", SourceKind::Generic),
        ] {
            assert_eq!(SourceLink::parse(url).kind, kind, "{url}");
        }
    }

    #[test_log::test]
    fn should_not_match_lookalike_hosts() {
        assert_eq!(kind_of("fox.com"), SourceKind::Generic);
        assert_eq!(kind_of("governanza.com"), SourceKind::Generic);
    }

    #[test_log::test]
    fn url_without_host_should_be_generic() {
        let source = SourceLink::parse("mailto:prensa@ate.org.ar");

        assert_eq!(source.kind, SourceKind::Generic);
        assert_eq!(source.domain, GENERIC_SOURCE_NAME);
    }
}
