use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Singleton settings row (id is always 1). Theme colors use the
/// `"H S% L%"` form the dashboard feeds straight into its stylesheet.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AppSettings {
    #[schema(example = "HR Dashboard")]
    pub project_name: String,

    /// Days credited to every active employee per accrual run.
    #[schema(example = 1.5)]
    pub accrual_amount: f64,

    #[schema(example = "222 47% 11%")]
    pub theme_primary: String,

    #[schema(example = "0 0% 100%")]
    pub theme_background: String,

    #[schema(example = "262 83% 58%")]
    pub theme_accent: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            project_name: "HR Dashboard".to_string(),
            accrual_amount: 1.5,
            theme_primary: "222 47% 11%".to_string(),
            theme_background: "0 0% 100%".to_string(),
            theme_accent: "262 83% 58%".to_string(),
        }
    }
}

/// Validates the `"H S% L%"` triple: hue 0-360, saturation and lightness
/// 0-100 with a trailing percent sign.
pub fn is_valid_hsl(value: &str) -> bool {
    let parts: Vec<&str> = value.split_whitespace().collect();
    if parts.len() != 3 {
        return false;
    }
    let hue_ok = parts[0]
        .parse::<u16>()
        .map(|h| h <= 360)
        .unwrap_or(false);
    let pct_ok = |part: &str| {
        part.strip_suffix('%')
            .and_then(|n| n.parse::<u8>().ok())
            .map(|n| n <= 100)
            .unwrap_or(false)
    };
    hue_ok && pct_ok(parts[1]) && pct_ok(parts[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_triples() {
        assert!(is_valid_hsl("222 47% 11%"));
        assert!(is_valid_hsl("0 0% 100%"));
        assert!(is_valid_hsl("360 100% 0%"));
    }

    #[test]
    fn rejects_malformed_triples() {
        assert!(!is_valid_hsl(""));
        assert!(!is_valid_hsl("222 47 11"));
        assert!(!is_valid_hsl("222 47% 11% extra"));
        assert!(!is_valid_hsl("361 47% 11%"));
        assert!(!is_valid_hsl("222 101% 11%"));
        assert!(!is_valid_hsl("#1a2b3c"));
    }

    #[test]
    fn defaults_are_valid_colors() {
        let settings = AppSettings::default();
        assert!(is_valid_hsl(&settings.theme_primary));
        assert!(is_valid_hsl(&settings.theme_background));
        assert!(is_valid_hsl(&settings.theme_accent));
        assert!(settings.accrual_amount > 0.0);
    }
}
