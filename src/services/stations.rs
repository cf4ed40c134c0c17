use std::collections::HashMap;
use std::sync::LazyLock;

/// Spellings of Baku metro station names mapped to their reference label
const STATION_ALIASES: &[(&str, &str)] = &[
    ("28 May", "28 May"),
    ("28 may", "28 May"),
    ("28-may", "28 May"),
    ("İçərişəhər", "İçərişəhər"),
    ("Icherisheher", "İçərişəhər"),
    ("Icheri Sheher", "İçərişəhər"),
    ("Sahil", "Sahil"),
    ("Gənclik", "Gənclik"),
    ("Genclik", "Gənclik"),
    ("Nəriman Nərimanov", "Nəriman Nərimanov"),
    ("Nariman Narimanov", "Nəriman Nərimanov"),
    ("Ulduz", "Ulduz"),
    ("Koroglu", "Koroğlu"),
    ("Koroğlu", "Koroğlu"),
    ("Qara Qarayev", "Qara Qarayev"),
    ("Kara Karayev", "Qara Qarayev"),
    ("Nəsimi", "Nəsimi"),
    ("Nasimi", "Nəsimi"),
    ("Azadlıq prospekti", "Azadlıq prospekti"),
    ("Azadliq prospekti", "Azadlıq prospekti"),
    ("Azadlıq Prospekti", "Azadlıq prospekti"),
    ("Nizami", "Nizami"),
    ("İnşaatçılar", "İnşaatçılar"),
    ("Inshaatchilar", "İnşaatçılar"),
    ("Elmler Akademiyası", "Elmler Akademiyası"),
    ("Elmler Akademiyasi", "Elmler Akademiyası"),
    ("Nizami Gəncəvi", "Nizami Gəncəvi"),
    ("Nizami Ganjavi", "Nizami Gəncəvi"),
    ("Bakmil", "Bakmil"),
    ("Avtovağzal", "Avtovağzal"),
    ("Avtovagzal", "Avtovağzal"),
    ("20 Yanvar", "20 Yanvar"),
    ("20 yanvar", "20 Yanvar"),
    ("Memar Əcəmi", "Memar Əcəmi"),
    ("Memar Ajami", "Memar Əcəmi"),
    ("Dərnəgül", "Dərnəgül"),
    ("Darnagul", "Dərnəgül"),
    ("Bakıxanov", "Bakıxanov"),
    ("Bakikhanov", "Bakıxanov"),
    ("Xalqlar Dostluğu", "Xalqlar Dostluğu"),
    ("Khalklar Dostlugu", "Xalqlar Dostluğu"),
    ("Neftçilər", "Neftçilər"),
    ("Neftchilar", "Neftçilər"),
    ("Avrora", "Avrora"),
    ("Həzi Aslanov", "Həzi Aslanov"),
    ("Hazi Aslanov", "Həzi Aslanov"),
];

/// Station names that are closed, misplaced or not metro stations at all
const EXCLUDED_STATIONS: &[&str] = &[
    "mehemmed hadi",
    "mehəmməd hadi",
    "mehemmedhadi",
    "məhəmməd hadi",
    "azerneft",
    "azərneft",
    "azər neft yağ",
    "azər neft",
    "ag seher",
    "ağ şəhər",
    "agseher",
    "ağseher",
    "şah ismayıl xətai",
    "shah ismayil xetai",
    "şah ismayıl",
    "shah ismayil",
];

const STATION_SUFFIXES: &[&str] = &[" Metro", " metro", " Station", " station"];

static EXACT: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| STATION_ALIASES.iter().copied().collect());

static CASE_INSENSITIVE: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    let mut map = HashMap::with_capacity(STATION_ALIASES.len());
    for (alias, canonical) in STATION_ALIASES {
        // First spelling wins when two aliases fold to the same key
        map.entry(alias.to_lowercase()).or_insert(*canonical);
    }
    map
});

fn lookup(name: &str) -> Option<&'static str> {
    EXACT
        .get(name)
        .copied()
        .or_else(|| CASE_INSENSITIVE.get(&name.trim().to_lowercase()).copied())
}

/// Map a station name to its reference spelling
///
/// Tries an exact match, then a case-insensitive one. Names that mention
/// "metro" or "subway" get their "Metro"/"Station" suffixes stripped before a
/// last attempt. Unknown names come back unchanged.
pub fn canonical_station_name(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }

    if let Some(canonical) = lookup(name) {
        return canonical.to_string();
    }

    let lowered = name.trim().to_lowercase();
    if lowered.contains("metro") || lowered.contains("subway") {
        let cleaned = STATION_SUFFIXES
            .iter()
            .fold(name.to_string(), |acc, suffix| acc.replace(suffix, ""));
        if let Some(canonical) = lookup(&cleaned) {
            return canonical.to_string();
        }
    }

    name.to_string()
}

/// Whether a station name matches the exclusion list
pub fn is_excluded_station(name: &str) -> bool {
    let lowered = name.to_lowercase();
    EXCLUDED_STATIONS
        .iter()
        .any(|excluded| lowered.contains(excluded))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_case_insensitive() {
        assert_eq!(canonical_station_name("Genclik"), "Gənclik");
        assert_eq!(canonical_station_name("GENCLIK"), "Gənclik");
        assert_eq!(canonical_station_name("  nariman narimanov "), "Nəriman Nərimanov");
    }

    #[test]
    fn test_suffix_stripping() {
        assert_eq!(canonical_station_name("Memar Ajami Metro"), "Memar Əcəmi");
        assert_eq!(canonical_station_name("Koroglu metro station"), "Koroğlu");
    }

    #[test]
    fn test_unknown_name_unchanged() {
        assert_eq!(canonical_station_name("Some Depot"), "Some Depot");
        assert_eq!(canonical_station_name(""), "");
    }

    #[test]
    fn test_excluded_stations() {
        assert!(is_excluded_station("Şah ismayıl Xətai"));
        assert!(is_excluded_station("Azərneft metro"));
        assert!(is_excluded_station("AG SEHER"));
        assert!(!is_excluded_station("Sahil"));
    }
}
