/// Boundary-file names (world-atlas) paired with the World Bank names used by
/// the population CSVs.
const ALIASES: &[(&str, &str)] = &[
    ("United States of America", "United States"),
    ("Russia", "Russian Federation"),
    ("Dem. Rep. Congo", "Congo, Dem. Rep."),
    ("Congo", "Congo, Rep."),
    ("Central African Rep.", "Central African Republic"),
    ("S. Sudan", "South Sudan"),
    ("Bosnia and Herz.", "Bosnia and Herzegovina"),
    ("Dominican Rep.", "Dominican Republic"),
    ("Eq. Guinea", "Equatorial Guinea"),
    ("eSwatini", "Eswatini"),
    ("Iran", "Iran, Islamic Rep."),
    ("Syria", "Syrian Arab Republic"),
    ("Venezuela", "Venezuela, RB"),
    ("Egypt", "Egypt, Arab Rep."),
    ("Yemen", "Yemen, Rep."),
    ("Laos", "Lao PDR"),
    ("Vietnam", "Viet Nam"),
    ("South Korea", "Korea, Rep."),
    ("North Korea", "Korea, Dem. People's Rep."),
    ("Kyrgyzstan", "Kyrgyz Republic"),
    ("Slovakia", "Slovak Republic"),
    ("Macedonia", "North Macedonia"),
    ("Turkey", "Turkiye"),
    ("Gambia", "Gambia, The"),
    ("Bahamas", "Bahamas, The"),
    ("Côte d'Ivoire", "Cote d'Ivoire"),
    ("Solomon Is.", "Solomon Islands"),
    ("Brunei", "Brunei Darussalam"),
    ("Palestine", "West Bank and Gaza"),
    ("Czechia", "Czech Republic"),
];

/// The other spelling of a country name, if one is known
pub fn alternate_name(name: &str) -> Option<&'static str> {
    let name = name.trim().to_lowercase();
    ALIASES.iter().find_map(|&(map, dataset)| {
        if map.to_lowercase() == name {
            Some(dataset)
        } else if dataset.to_lowercase() == name {
            Some(map)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_directions() {
        assert_eq!(alternate_name("united states of america"), Some("United States"));
        assert_eq!(alternate_name("Russian Federation"), Some("Russia"));
        assert_eq!(alternate_name("Nepal"), None);
    }
}
