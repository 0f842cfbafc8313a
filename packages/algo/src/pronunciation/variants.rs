//! Accepted toddler pronunciations, keyed by normalized target word.

use std::collections::HashMap;
use std::sync::OnceLock;

pub type VariantTable = HashMap<&'static str, &'static [&'static str]>;

const TODDLER_VARIANTS: &[(&str, &[&str])] = &[
    // Numbers
    ("ONE", &["WON", "WAN", "ON", "UN"]),
    ("TWO", &["TO", "TOO", "TU", "DO", "SHOE"]),
    ("THREE", &["TREE", "FREE", "FWEE", "SREE"]),
    ("FOUR", &["FOR", "FO", "FOW"]),
    ("FIVE", &["FIVE", "FIFE", "FIV", "PIE"]),
    ("SIX", &["SICKS", "SICK", "SEX", "ISH"]),
    ("SEVEN", &["SEVEN", "SEVN", "SAVEN"]),
    ("EIGHT", &["ATE", "EIT", "AIT"]),
    ("NINE", &["NINE", "NIEN", "NAN"]),
    ("TEN", &["TAN", "TIN", "DEN"]),
    // Colors
    ("RED", &["WED", "RAD", "RID"]),
    ("BLUE", &["BOO", "BWUE", "BLU", "LOO"]),
    ("GREEN", &["GWEEN", "GEEN", "GRIN"]),
    ("YELLOW", &["LELLOW", "YEYOW", "YELLO"]),
    ("ORANGE", &["AWNGE", "ORNJ", "ANJ"]),
    ("PURPLE", &["PUPPLE", "POPLE"]),
    // Fruits
    ("APPLE", &["APPU", "APPEL", "APOL"]),
    ("BANANA", &["NANA", "BANA", "NANNA"]),
    ("GRAPES", &["GAPES", "GWAPES"]),
    // Shapes
    ("CIRCLE", &["SIKLE", "SIRKEL", "COCO"]),
    ("SQUARE", &["SKWARE", "KARE"]),
    ("STAR", &["TAH", "TAR", "STA"]),
];

static TABLE: OnceLock<VariantTable> = OnceLock::new();

/// Process-wide table, built on first use
pub fn toddler_variants() -> &'static VariantTable {
    TABLE.get_or_init(|| TODDLER_VARIANTS.iter().copied().collect())
}

/// Variants for a normalized target, in table order
pub fn variants_for(target: &str) -> Option<&'static [&'static str]> {
    toddler_variants().get(target).copied()
}
