/// Display style for one pollution level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelStyle {
    pub class: &'static str,
    pub icon: &'static str,
}

/// Indexed by the backend's level encoding: 0 is the cleanest air, 4 the worst.
pub const LEVEL_STYLES: [LevelStyle; 5] = [
    LevelStyle { class: "good", icon: "🟢" },
    LevelStyle { class: "moderate", icon: "🟡" },
    LevelStyle { class: "unhealthy-sensitive", icon: "🟠" },
    LevelStyle { class: "unhealthy", icon: "🔴" },
    LevelStyle { class: "very-unhealthy", icon: "⚫" },
];

pub const MAX_LEVEL: i64 = LEVEL_STYLES.len() as i64 - 1;

/// Levels outside the table fall back to the first entry.
pub fn style_for_level(level: i64) -> LevelStyle {
    usize::try_from(level)
        .ok()
        .and_then(|idx| LEVEL_STYLES.get(idx))
        .copied()
        .unwrap_or(LEVEL_STYLES[0])
}
