//! List icon aliases.

const ICON_ALIASES: &[(&str, &str)] = &[
    ("cart", "🛒"),
    ("shopping", "🛒"),
    ("home", "🏠"),
    ("house", "🏠"),
    ("gift", "🎁"),
    ("present", "🎁"),
    ("christmas", "🎄"),
    ("xmas", "🎄"),
    ("birthday", "🎂"),
    ("cake", "🎂"),
    ("food", "🍕"),
    ("pizza", "🍕"),
    ("salad", "🥗"),
    ("healthy", "🥗"),
    ("medicine", "💊"),
    ("health", "💊"),
    ("pills", "💊"),
    ("pet", "🐕"),
    ("pets", "🐕"),
    ("dog", "🐕"),
    ("cleaning", "🧹"),
    ("clean", "🧹"),
    ("package", "📦"),
    ("packages", "📦"),
    ("box", "📦"),
    ("travel", "✈️"),
    ("trip", "✈️"),
    ("flight", "✈️"),
    ("fitness", "🏋️"),
    ("gym", "🏋️"),
    ("workout", "🏋️"),
    ("books", "📚"),
    ("book", "📚"),
    ("reading", "📚"),
    ("tools", "🛠️"),
    ("tool", "🛠️"),
    ("work", "💼"),
    ("office", "💼"),
    ("business", "💼"),
];

/// Map a known alias to its emoji; anything else is returned as given.
pub fn normalize_icon(icon: &str) -> String {
    ICON_ALIASES
        .iter()
        .find(|(alias, _)| *alias == icon)
        .map(|(_, emoji)| (*emoji).to_string())
        .unwrap_or_else(|| icon.to_string())
}
