//! Column lists shared by the chart constructors.
//!
//! These are immutable: constructors copy them before appending extras.

/// Columns drawn as one line each in the national charts.
pub const NATIONAL_COLUMNS_TO_SHOW: [&str; 7] = [
    "deceduti",
    "dimessi_guariti",
    "nuovi_positivi",
    "totale_casi",
    "terapia_intensiva",
    "totale_ospedalizzati",
    "isolamento_domiciliare",
];

/// Hover fields of the national overview chart.
pub const NATIONAL_HOVER_FIELDS: [&str; 9] = [
    "data",
    "deceduti",
    "dimessi_guariti",
    "nuovi_positivi",
    "totale_casi",
    "tamponi",
    "terapia_intensiva",
    "totale_ospedalizzati",
    "isolamento_domiciliare",
];

/// Base hover fields of the per-region chart.
pub const REGIONAL_HOVER_FIELDS: [&str; 14] = [
    "denominazione_regione",
    "lat",
    "long",
    "ricoverati_con_sintomi",
    "terapia_intensiva",
    "totale_ospedalizzati",
    "isolamento_domiciliare",
    "totale_positivi",
    "variazione_totale_positivi",
    "nuovi_positivi",
    "dimessi_guariti",
    "deceduti",
    "totale_casi",
    "tamponi",
];

/// Default grouping column of the per-region chart.
pub const REGION_NAME_FIELD: &str = "denominazione_regione";

/// Default plotted quantity of the per-region chart.
pub const REGIONAL_DEFAULT_Y_FIELD: &str = "nuovi_positivi";
