/// Display category of a `tipo_medida`
#[derive(strum::IntoStaticStr, strum::EnumIter, Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum MeasureCategory {
    Protesta,
    Huelga,
    Manifestacion,
    Conflicto,
    Otro,
}

const KNOWN_MEASURES: &[(&str, MeasureCategory)] = &[
    ("protesta", MeasureCategory::Protesta),
    ("huelga", MeasureCategory::Huelga),
    ("manifestacion", MeasureCategory::Manifestacion),
    ("conflicto", MeasureCategory::Conflicto),
];

impl MeasureCategory {
    /// Exact match, anything unknown or missing is [MeasureCategory::Otro]
    pub fn of(measure_type: Option<&str>) -> Self {
        measure_type
            .and_then(|measure_type| {
                KNOWN_MEASURES
                    .iter()
                    .find(|(known, _)| *known == measure_type)
                    .map(|(_, category)| *category)
            })
            .unwrap_or(MeasureCategory::Otro)
    }
}
