use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The fixed set of cities this deployment serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum City {
    Riyadh,
    Jeddah,
    Dammam,
    Makkah,
}

impl City {
    pub const ALL: [City; 4] = [City::Riyadh, City::Jeddah, City::Dammam, City::Makkah];

    pub fn as_str(&self) -> &'static str {
        match self {
            City::Riyadh => "riyadh",
            City::Jeddah => "jeddah",
            City::Dammam => "dammam",
            City::Makkah => "makkah",
        }
    }

    pub fn parse(s: &str) -> Option<City> {
        match s.to_lowercase().as_str() {
            "riyadh" => Some(City::Riyadh),
            "jeddah" => Some(City::Jeddah),
            "dammam" => Some(City::Dammam),
            "makkah" => Some(City::Makkah),
            _ => None,
        }
    }
}

/// Per-city metadata used for confirmations and reminder messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityInfo {
    pub name_ar: String,
    pub name_en: String,
    pub address: String,
    pub map_link: String,
    pub contact_phone: String,
    pub time_slots: Vec<String>,
}

/// City configuration loaded once at startup and passed by reference to the
/// services that need it.
#[derive(Debug, Clone)]
pub struct CityDirectory {
    cities: BTreeMap<City, CityInfo>,
}

impl CityDirectory {
    /// The reference deployment's city table.
    pub fn builtin() -> Self {
        let mut cities = BTreeMap::new();
        cities.insert(
            City::Riyadh,
            CityInfo {
                name_ar: "الرياض".to_string(),
                name_en: "Riyadh".to_string(),
                address: "الرياض - حي السلي".to_string(),
                map_link: "https://maps.app.goo.gl/TVFqRWki8nfnmuaw8".to_string(),
                contact_phone: "966558551076".to_string(),
                time_slots: vec!["14:00".to_string()],
            },
        );
        cities.insert(
            City::Jeddah,
            CityInfo {
                name_ar: "جدة".to_string(),
                name_en: "Jeddah".to_string(),
                address: "جدة - حي الروابي".to_string(),
                map_link: "https://maps.app.goo.gl/4XnMD3Dkhh1UE3o2A".to_string(),
                contact_phone: "966573551003".to_string(),
                time_slots: vec!["12:00".to_string()],
            },
        );
        cities.insert(
            City::Dammam,
            CityInfo {
                name_ar: "الدمام".to_string(),
                name_en: "Dammam".to_string(),
                address: "الدمام - حي المنار".to_string(),
                map_link: "https://maps.app.goo.gl/6mKFg6fVpLcxJgkP9".to_string(),
                contact_phone: "966510029651".to_string(),
                time_slots: vec!["17:00".to_string()],
            },
        );
        cities.insert(
            City::Makkah,
            CityInfo {
                name_ar: "مكة المكرمة".to_string(),
                name_en: "Makkah".to_string(),
                address: "مكة المكرمة - حي البحيرات".to_string(),
                map_link: "https://maps.app.goo.gl/GtV4TMEqfRGyhQfi8".to_string(),
                contact_phone: "966573542070".to_string(),
                time_slots: vec!["17:00".to_string()],
            },
        );
        Self { cities }
    }

    pub fn from_json(s: &str) -> anyhow::Result<Self> {
        let raw: BTreeMap<String, CityInfo> = serde_json::from_str(s)?;

        let mut cities = BTreeMap::new();
        for (key, info) in raw {
            let city = City::parse(&key)
                .ok_or_else(|| anyhow::anyhow!("unknown city in configuration: {key}"))?;
            if info.time_slots.is_empty() {
                return Err(anyhow::anyhow!("city {key} has no time slots"));
            }
            for slot in &info.time_slots {
                parse_time(slot)?;
            }
            cities.insert(city, info);
        }

        if cities.is_empty() {
            return Err(anyhow::anyhow!("city configuration is empty"));
        }
        Ok(Self { cities })
    }

    pub fn get(&self, city: City) -> Option<&CityInfo> {
        self.cities.get(&city)
    }

    /// Distinct slot times across all cities, sorted.
    pub fn all_slot_times(&self) -> Vec<String> {
        let mut slots: Vec<String> = self
            .cities
            .values()
            .flat_map(|info| info.time_slots.iter().cloned())
            .collect();
        slots.sort();
        slots.dedup();
        slots
    }
}

/// Minutes since midnight for a "HH:MM" slot string.
pub fn parse_time(s: &str) -> anyhow::Result<i64> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        return Err(anyhow::anyhow!("invalid time format: {s}"));
    }
    let hour: i64 = parts[0]
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid hour in: {s}"))?;
    let minute: i64 = parts[1]
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid minute in: {s}"))?;
    if !(0..24).contains(&hour) || !(0..60).contains(&minute) {
        return Err(anyhow::anyhow!("time out of range: {s}"));
    }
    Ok(hour * 60 + minute)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_all_cities() {
        let dir = CityDirectory::builtin();
        for city in City::ALL {
            assert!(dir.get(city).is_some(), "missing {}", city.as_str());
        }
    }

    #[test]
    fn test_parse_city() {
        assert_eq!(City::parse("riyadh"), Some(City::Riyadh));
        assert_eq!(City::parse("Jeddah"), Some(City::Jeddah));
        assert_eq!(City::parse("tabuk"), None);
    }

    #[test]
    fn test_from_json_valid() {
        let json = r#"{
            "riyadh": {
                "name_ar": "الرياض", "name_en": "Riyadh",
                "address": "addr", "map_link": "link", "contact_phone": "966500000000",
                "time_slots": ["14:00", "19:00"]
            }
        }"#;
        let dir = CityDirectory::from_json(json).unwrap();
        assert_eq!(dir.get(City::Riyadh).unwrap().time_slots.len(), 2);
        assert!(dir.get(City::Jeddah).is_none());
    }

    #[test]
    fn test_from_json_unknown_city() {
        let json = r#"{
            "tabuk": {
                "name_ar": "x", "name_en": "x",
                "address": "x", "map_link": "x", "contact_phone": "x",
                "time_slots": ["14:00"]
            }
        }"#;
        assert!(CityDirectory::from_json(json).is_err());
    }

    #[test]
    fn test_from_json_bad_slot() {
        let json = r#"{
            "riyadh": {
                "name_ar": "x", "name_en": "x",
                "address": "x", "map_link": "x", "contact_phone": "x",
                "time_slots": ["25:00"]
            }
        }"#;
        assert!(CityDirectory::from_json(json).is_err());
    }

    #[test]
    fn test_from_json_empty_slots() {
        let json = r#"{
            "riyadh": {
                "name_ar": "x", "name_en": "x",
                "address": "x", "map_link": "x", "contact_phone": "x",
                "time_slots": []
            }
        }"#;
        assert!(CityDirectory::from_json(json).is_err());
    }

    #[test]
    fn test_all_slot_times_deduped() {
        let dir = CityDirectory::builtin();
        let slots = dir.all_slot_times();
        // dammam and makkah share 17:00
        assert_eq!(slots, vec!["12:00", "14:00", "17:00"]);
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("12:00").unwrap(), 720);
        assert_eq!(parse_time("00:05").unwrap(), 5);
        assert!(parse_time("24:00").is_err());
        assert!(parse_time("12:60").is_err());
        assert!(parse_time("noon").is_err());
    }
}
