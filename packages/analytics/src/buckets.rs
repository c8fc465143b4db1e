//! Fixed choropleth scale for event counts.

use wanbei_map_analytics_models::Bucket;

/// Fill alpha suffix for city polygons on the overview map.
pub const OVERVIEW_ALPHA: &str = "80";

/// Fill alpha suffix for sub-region polygons on the detail map.
pub const DETAIL_ALPHA: &str = "60";

/// Ascending, contiguous, exhaustive over `u64`.
static BUCKETS: [Bucket; 6] = [
    Bucket {
        min: 0,
        max: Some(30),
        color: "#87CEEB",
        label: "30件以下",
    },
    Bucket {
        min: 30,
        max: Some(60),
        color: "#9370DB",
        label: "30-60件",
    },
    Bucket {
        min: 60,
        max: Some(90),
        color: "#FF69B4",
        label: "60-90件",
    },
    Bucket {
        min: 90,
        max: Some(120),
        color: "#FF6347",
        label: "90-120件",
    },
    Bucket {
        min: 120,
        max: Some(150),
        color: "#FFA500",
        label: "120-150件",
    },
    Bucket {
        min: 150,
        max: None,
        color: "#FFD700",
        label: "150件以上",
    },
];

/// The bucket whose range contains `count`. Edge values belong to the
/// higher bucket.
#[must_use]
pub fn classify(count: u64) -> &'static Bucket {
    BUCKETS
        .iter()
        .find(|bucket| bucket.contains(count))
        .unwrap_or(&BUCKETS[0])
}

/// Convenience for `usize` counts coming from aggregation.
#[must_use]
pub fn classify_count(count: usize) -> &'static Bucket {
    classify(u64::try_from(count).unwrap_or(u64::MAX))
}

/// All buckets in ascending order, for legends.
#[must_use]
pub fn legend() -> &'static [Bucket] {
    &BUCKETS
}

/// Appends a two-digit hex alpha to a `#RRGGBB` color. Colors that
/// already carry alpha, or are not in `#RRGGBB` form, are returned as-is.
#[must_use]
pub fn with_alpha(color: &str, alpha: &str) -> String {
    let is_rgb = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if is_rgb {
        format!("{color}{alpha}")
    } else {
        color.to_string()
    }
}
