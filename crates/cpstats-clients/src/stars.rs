/// Lower bound of each CodeChef star tier, one entry per star.
const STAR_THRESHOLDS: [i64; 7] = [1400, 1600, 1800, 2000, 2200, 2500, 3000];

/// Derives CodeChef's star tier (0 to 7) from a numeric rating.
///
/// Each threshold belongs to the tier it opens: 1400 is one star, 2999 is six,
/// 3000 and above is seven.
#[must_use]
pub fn calculate_stars(rating: i64) -> u8 {
    let tiers = STAR_THRESHOLDS.iter().filter(|t| rating >= **t).count();
    // At most STAR_THRESHOLDS.len() == 7.
    u8::try_from(tiers).unwrap_or(7)
}
