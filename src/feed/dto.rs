use super::model::{Event, Feed};
use chrono::DateTime;
use serde::{Deserialize, Deserializer};
use serde_either::SingleOrVec;
use serde_json::Value;
use tracing::warn;

const SOURCE_SEPARATOR: &str = ", ";

#[derive(Debug, Deserialize)]
pub struct FeedResponse {
    #[serde(default, deserialize_with = "deserialize_opt_str")]
    pub last_updated: Option<String>,
    #[serde(default, deserialize_with = "deserialize_events")]
    pub events: Vec<EventResponse>,
}

// Note: every field needs the custom deserializer since the producer
// writes whatever the extraction returned (nulls, numbers, empty strings)
#[derive(Debug, Default, Deserialize)]
pub struct EventResponse {
    #[serde(default, deserialize_with = "deserialize_opt_str")]
    pub fecha: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_str")]
    pub horario: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_str")]
    pub tipo_medida: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_str")]
    pub descripcion: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_str")]
    pub que: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_str")]
    pub lugar: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_str")]
    pub quien: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_str")]
    pub motivo: Option<String>,
    #[serde(default, deserialize_with = "deserialize_sources")]
    pub fuente: Option<String>,
}

impl FeedResponse {
    pub fn to_model(self) -> Feed {
        let last_updated = self.last_updated.and_then(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .inspect_err(|err| warn!("Ignoring invalid last_updated '{raw}'. Err: {err}"))
                .ok()
        });

        Feed {
            last_updated,
            events: self.events.into_iter().map(EventResponse::to_model).collect(),
        }
    }
}

impl EventResponse {
    pub fn to_model(self) -> Event {
        Event {
            date: self.fecha,
            time: self.horario,
            measure_type: self.tipo_medida,
            description: self.descripcion,
            what: self.que,
            place: self.lugar,
            who: self.quien,
            reason: self.motivo,
            sources: self.fuente,
        }
    }
}

pub fn parse_feed(json: &str) -> Result<Feed, serde_json::Error> {
    serde_json::from_str::<FeedResponse>(json).map(FeedResponse::to_model)
}

fn non_blank(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

fn deserialize_opt_str<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(d)? {
        Value::String(s) => non_blank(s),
        _ => None,
    })
}

fn deserialize_sources<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(d)?;

    Ok(
        match serde_json::from_value::<SingleOrVec<String>>(value) {
            Ok(SingleOrVec::Single(source)) => non_blank(source),
            Ok(SingleOrVec::Vec(sources)) => non_blank(sources.join(SOURCE_SEPARATOR)),
            Err(_) => None,
        },
    )
}

fn deserialize_events<'de, D>(d: D) -> Result<Vec<EventResponse>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(d)? {
        Value::Array(items) => items,
        other => {
            warn!("Expected an array of events, found: {}", other);
            return Ok(Vec::new());
        }
    };

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            serde_json::from_value::<EventResponse>(item)
                .inspect_err(|err| warn!("Skipping event #{index}. Err: {err}"))
                .ok()
        })
        .collect())
}
