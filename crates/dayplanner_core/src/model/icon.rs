//! Task icon catalog.
//!
//! Icons are free-form single glyphs; the catalog only drives the picker.
//! `set_task_icon` accepts any glyph.

/// Icon assigned to new tasks and to migrated tasks without one.
pub const DEFAULT_TASK_ICON: &str = "📝";

/// Picker categories in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconCategory {
    Work,
    Home,
    Health,
    Leisure,
    Travel,
    Nature,
    Food,
    Awards,
}

impl IconCategory {
    pub const ALL: [IconCategory; 8] = [
        IconCategory::Work,
        IconCategory::Home,
        IconCategory::Health,
        IconCategory::Leisure,
        IconCategory::Travel,
        IconCategory::Nature,
        IconCategory::Food,
        IconCategory::Awards,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Home => "home",
            Self::Health => "health",
            Self::Leisure => "leisure",
            Self::Travel => "travel",
            Self::Nature => "nature",
            Self::Food => "food",
            Self::Awards => "awards",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|category| category.name() == value)
    }

    pub fn icons(self) -> &'static [&'static str] {
        match self {
            Self::Work => &["💼", "📝", "📊", "📈", "💻", "📞", "✅", "🎯", "💡", "🔍"],
            Self::Home => &["🏠", "🛒", "🍽️", "🧹", "🛏️", "🚿", "🔧", "🔑", "📦", "🏡"],
            Self::Health => &["💪", "🏃", "🧘", "💊", "🏥", "🦷", "👁️", "🩺", "❤️", "🧠"],
            Self::Leisure => &["🎵", "🎨", "🎬", "📚", "🎮", "🎪", "🎭", "🎲", "🎸", "📷"],
            Self::Travel => &["✈️", "🚗", "🚢", "🚂", "🏖️", "🗺️", "🧳", "📍", "🏕️", "🎒"],
            Self::Nature => &["🌸", "🌺", "🌻", "🌿", "🍀", "🌳", "🌊", "🏔️", "☀️", "🌙"],
            Self::Food => &["🍎", "🥗", "🍕", "☕", "🍰", "🥑", "🍓", "🥪", "🍜", "🧊"],
            Self::Awards => &["🏆", "🎖️", "🥇", "⭐", "🌟", "🎁", "🎉", "💎", "👑", "🏅"],
        }
    }
}

/// Returns whether the glyph appears in any picker category.
pub fn is_known_icon(glyph: &str) -> bool {
    IconCategory::ALL
        .iter()
        .any(|category| category.icons().contains(&glyph))
}

/// Returns the first category listing the glyph.
pub fn category_of(glyph: &str) -> Option<IconCategory> {
    IconCategory::ALL
        .into_iter()
        .find(|category| category.icons().contains(&glyph))
}
