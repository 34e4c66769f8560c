//! Human-readable sizes
//!
//! DB2 reports almost everything in kilobytes.

pub fn kb_to_human_size(kb: u64) -> String {
    bytes_to_human_size(kb.saturating_mul(1024))
}

pub fn bytes_to_human_size(bytes: u64) -> String {
    let mut bytes = bytes as f64;
    let sizes = ["B", "K", "M", "G", "T"];
    let mut reductions = 0;
    while reductions < sizes.len() - 1 {
        if bytes > 1000.0 {
            bytes /= 1024.0;
            reductions += 1;
        } else {
            break;
        }
    }
    format!("{:.1}{}", bytes, sizes[reductions])
}

/// Percent of `whole` taken up by `part`, 0 when `whole` is 0
pub fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64) * 100.0
    }
}

#[cfg(test)]
mod test {
    use super::{bytes_to_human_size, kb_to_human_size, percent};

    #[test]
    fn human_size_produces_shortest() {
        let reprs = [
            (999, "999.0B"),
            (9_999, "9.8K"),
            (9_999_999, "9.5M"),
            (35_999_999, "34.3M"),
            (9_999_999_999, "9.3G"),
            (9_999_999_999_999, "9.1T"),
        ];
        for &(raw, repr) in reprs.iter() {
            assert_eq!(bytes_to_human_size(raw), repr);
        }
        assert_eq!(kb_to_human_size(2048), "2.0M");
    }

    #[test]
    fn percent_handles_empty_whole() {
        assert_eq!(percent(5, 0), 0.0);
        assert_eq!(percent(25, 100), 25.0);
    }
}
