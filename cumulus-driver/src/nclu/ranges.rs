//! VLAN range globs such as `71-72,100,4001`.

use std::collections::BTreeSet;

use crate::error::ParseError;

/// Expand a glob into sorted, de-duplicated VLAN ids.
///
/// An empty glob expands to nothing.
pub fn expand_glob(glob: &str) -> Result<Vec<u16>, ParseError> {
    let invalid = || ParseError::InvalidValue {
        field: "vlan range",
        value: glob.to_string(),
    };

    let mut ids = BTreeSet::new();
    for part in glob.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once('-') {
            Some((start, end)) => {
                let start: u16 = start.trim().parse().map_err(|_| invalid())?;
                let end: u16 = end.trim().parse().map_err(|_| invalid())?;
                if start > end {
                    return Err(invalid());
                }
                ids.extend(start..=end);
            }
            None => {
                ids.insert(part.parse().map_err(|_| invalid())?);
            }
        }
    }
    Ok(ids.into_iter().collect())
}

/// Compress VLAN ids into the shortest glob.
pub fn to_glob(ids: &[u16]) -> String {
    let ids: BTreeSet<u16> = ids.iter().copied().collect();
    let mut parts = Vec::new();
    let mut iter = ids.into_iter();

    let Some(mut start) = iter.next() else {
        return String::new();
    };
    let mut end = start;
    for id in iter {
        if id == end + 1 {
            end = id;
            continue;
        }
        parts.push(range_part(start, end));
        start = id;
        end = id;
    }
    parts.push(range_part(start, end));
    parts.join(",")
}

fn range_part(start: u16, end: u16) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{start}-{end}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand() {
        assert_eq!(expand_glob("71-72,100").unwrap(), vec![71, 72, 100]);
        assert_eq!(expand_glob("71").unwrap(), vec![71]);
        assert_eq!(expand_glob("").unwrap(), Vec::<u16>::new());
        assert_eq!(expand_glob("100, 71-72, 72").unwrap(), vec![71, 72, 100]);
        assert_eq!(expand_glob("4000-4095").unwrap().len(), 96);
    }

    #[test]
    fn test_expand_invalid() {
        assert!(expand_glob("72-71").is_err());
        assert!(expand_glob("abc").is_err());
        assert!(expand_glob("1-").is_err());
        assert!(expand_glob("70000").is_err());
    }

    #[test]
    fn test_to_glob() {
        assert_eq!(to_glob(&[71, 72, 100]), "71-72,100");
        assert_eq!(to_glob(&[100, 72, 71, 72]), "71-72,100");
        assert_eq!(to_glob(&[5]), "5");
        assert_eq!(to_glob(&[]), "");
        assert_eq!(to_glob(&[1, 2, 3, 10, 11, 20]), "1-3,10-11,20");
    }
}
