//! Fixed label tables: cause descriptions, month names, sex labels and the
//! age-group buckets.

use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const UNSPECIFIED_CAUSE: &str = "Causa no especificada";
pub const UNKNOWN_LABEL: &str = "Desconocido";

/// Prefix of the homicide cause codes.
pub const HOMICIDE_PREFIX: &str = "X95";

static CAUSE_DESCRIPTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("I219", "Infarto agudo del miocardio"),
        ("J449", "Enfermedad pulmonar obstructiva crónica"),
        ("C349", "Cáncer de pulmón"),
        ("I64", "Accidente cerebrovascular"),
        ("I10", "Hipertensión esencial"),
        ("C509", "Cáncer de mama"),
        ("C61", "Cáncer de próstata"),
        ("E149", "Diabetes mellitus no especificada"),
        ("K729", "Enfermedad hepática"),
        ("X95", "Homicidio"),
    ])
});

pub const MONTH_NAMES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Bucket for each raw age-group code; the index is the code.
pub const AGE_BUCKETS: [&str; 30] = [
    "Mortalidad neonatal",
    "Mortalidad neonatal",
    "Mortalidad neonatal",
    "Mortalidad neonatal",
    "Mortalidad neonatal",
    "Mortalidad infantil",
    "Mortalidad infantil",
    "Primera infancia",
    "Primera infancia",
    "Niñez",
    "Niñez",
    "Adolescencia",
    "Juventud",
    "Juventud",
    "Adultez temprana",
    "Adultez temprana",
    "Adultez temprana",
    "Adultez intermedia",
    "Adultez intermedia",
    "Adultez intermedia",
    "Vejez",
    "Vejez",
    "Vejez",
    "Vejez",
    "Vejez",
    "Longevidad / Centenarios",
    "Longevidad / Centenarios",
    "Longevidad / Centenarios",
    "Longevidad / Centenarios",
    "Edad desconocida",
];

/// Exact-match lookup; unknown codes get [`UNSPECIFIED_CAUSE`].
pub fn cause_description(code: &str) -> &'static str {
    CAUSE_DESCRIPTIONS
        .get(code)
        .copied()
        .unwrap_or(UNSPECIFIED_CAUSE)
}

/// Month number (1..=12) to its Spanish name.
pub fn month_name(month: Option<i32>) -> Option<&'static str> {
    let m = month?;
    if (1..=12).contains(&m) {
        Some(MONTH_NAMES[(m - 1) as usize])
    } else {
        None
    }
}

pub fn sex_label(sex: Option<i32>) -> &'static str {
    match sex {
        Some(1) => "Masculino",
        Some(2) => "Femenino",
        Some(3) => "Indeterminado",
        _ => UNKNOWN_LABEL,
    }
}

pub fn age_bucket(code: i32) -> Option<&'static str> {
    usize::try_from(code).ok().and_then(|i| AGE_BUCKETS.get(i)).copied()
}

static AGE_BUCKET_ORDER: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let mut order: Vec<&'static str> = Vec::new();
    for b in AGE_BUCKETS {
        if !order.contains(&b) {
            order.push(b);
        }
    }
    order
});

/// Distinct bucket names in table order.
pub fn age_bucket_order() -> &'static [&'static str] {
    &AGE_BUCKET_ORDER
}
