//! The three response shapes built from one selected entry sequence.

use std::collections::BTreeMap;

use rand::Rng;

use crate::types::{DetailedEntry, DirectoryEntry};

/// Prefix for entries that carry no name of their own.
pub const PLACEHOLDER_PREFIX: &str = "unknown_";

/// Name -> URL map. Entries without `data.space` get a placeholder name drawn
/// from `rng` that does not collide with any earlier key. A repeated name
/// keeps the URL of the last entry carrying it.
pub fn by_name<'a, I, R>(entries: I, rng: &mut R) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = &'a DirectoryEntry>,
    R: Rng,
{
    let mut out = BTreeMap::new();
    for entry in entries {
        let name = match entry.space() {
            Some(space) => space.to_string(),
            None => loop {
                let candidate = format!("{PLACEHOLDER_PREFIX}{}", rng.random_range(0..=i64::MAX));
                if !out.contains_key(&candidate) {
                    break candidate;
                }
            },
        };
        out.insert(name, entry.url.clone());
    }
    out
}

/// Optional fields of the detailed view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetailOptions {
    pub include_data: bool,
    pub include_validation_result: bool,
}

pub fn detailed<'a, I>(entries: I, opts: DetailOptions) -> Vec<DetailedEntry>
where
    I: IntoIterator<Item = &'a DirectoryEntry>,
{
    entries
        .into_iter()
        .map(|e| DetailedEntry {
            url: e.url.clone(),
            valid: e.valid,
            space: e.space().unwrap_or_default().to_string(),
            last_seen: e.last_seen,
            err_msg: e.err_msg.clone(),
            data: e.data.clone().filter(|_| opts.include_data),
            validation_result: e
                .validation_result
                .clone()
                .filter(|_| opts.include_validation_result),
        })
        .collect()
}

pub fn raw<'a, I>(entries: I) -> Vec<DirectoryEntry>
where
    I: IntoIterator<Item = &'a DirectoryEntry>,
{
    entries.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ValidationResult;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn entry(url: &str, valid: bool, space: Option<&str>) -> DirectoryEntry {
        DirectoryEntry {
            url: url.to_string(),
            valid,
            last_seen: Some(42),
            err_msg: vec![],
            data: space.map(|s| json!({"space": s, "state": {"open": true}})),
            validation_result: Some(ValidationResult {
                valid,
                reachable: true,
                ..Default::default()
            }),
        }
    }

    #[test]
    fn by_name_uses_space() {
        let entries = [entry("http://a", true, Some("A")), entry("http://b", true, Some("B"))];
        let map = by_name(&entries, &mut StdRng::seed_from_u64(7));
        assert_eq!(map.len(), 2);
        assert_eq!(map["A"], "http://a");
        assert_eq!(map["B"], "http://b");
    }

    #[test]
    fn by_name_placeholders_are_distinct() {
        let entries: Vec<_> = (0..50)
            .map(|i| entry(&format!("http://{i}"), true, None))
            .collect();
        let map = by_name(&entries, &mut StdRng::seed_from_u64(1));
        assert_eq!(map.len(), 50);
        for key in map.keys() {
            let suffix = key.strip_prefix(PLACEHOLDER_PREFIX).expect("placeholder prefix");
            let n: i64 = suffix.parse().expect("numeric suffix");
            assert!(n >= 0);
        }
    }

    #[test]
    fn by_name_collisions_keep_last() {
        let entries = [
            entry("http://first", true, Some("Same")),
            entry("http://second", true, Some("Same")),
        ];
        let map = by_name(&entries, &mut StdRng::seed_from_u64(3));
        assert_eq!(map.len(), 1);
        assert_eq!(map["Same"], "http://second");
    }

    #[test]
    fn by_name_ignores_non_string_space() {
        let mut e = entry("http://a", true, None);
        e.data = Some(json!({"space": 12}));
        let map = by_name([&e], &mut StdRng::seed_from_u64(9));
        let key = map.keys().next().unwrap();
        assert!(key.starts_with(PLACEHOLDER_PREFIX));
    }

    #[test]
    fn detailed_omits_optional_fields_by_default() {
        let entries = [entry("http://a", true, Some("A")), entry("http://b", false, None)];
        let out = detailed(&entries, DetailOptions::default());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].space, "A");
        assert_eq!(out[1].space, "");
        assert!(out.iter().all(|e| e.data.is_none() && e.validation_result.is_none()));

        let encoded = serde_json::to_value(&out[1]).unwrap();
        assert_eq!(
            encoded,
            json!({"url": "http://b", "valid": false, "space": "", "lastSeen": 42})
        );
    }

    #[test]
    fn detailed_includes_optional_fields_when_present() {
        let entries = [entry("http://a", true, Some("A")), entry("http://b", true, None)];
        let opts = DetailOptions {
            include_data: true,
            include_validation_result: false,
        };
        let out = detailed(&entries, opts);
        assert_eq!(out[0].data, entries[0].data);
        assert!(out[1].data.is_none());
        assert!(out[0].validation_result.is_none());

        let opts = DetailOptions {
            include_data: false,
            include_validation_result: true,
        };
        let out = detailed(&entries, opts);
        assert!(out[0].data.is_none());
        assert_eq!(out[0].validation_result, entries[0].validation_result);
    }

    #[test]
    fn raw_is_verbatim() {
        let entries = [entry("http://a", true, Some("A")), entry("http://b", false, None)];
        assert_eq!(raw(&entries), entries.to_vec());
    }

    #[test]
    fn empty_selections_encode_as_empty_containers() {
        let none: [DirectoryEntry; 0] = [];
        assert_eq!(
            serde_json::to_string(&by_name(&none, &mut StdRng::seed_from_u64(0))).unwrap(),
            "{}"
        );
        assert_eq!(serde_json::to_string(&detailed(&none, DetailOptions::default())).unwrap(), "[]");
        assert_eq!(serde_json::to_string(&raw(&none)).unwrap(), "[]");
    }
}
