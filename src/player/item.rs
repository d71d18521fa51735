use std::fmt;

/// Every kind of item a player can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemName {
    Key,
    Torch,
    Potion,
    Map,
    Rope,
    Lantern,
    Compass,
    Scroll,
}

impl ItemName {
    pub const COUNT: usize = 8;

    pub const ALL: [ItemName; Self::COUNT] = [
        ItemName::Key,
        ItemName::Torch,
        ItemName::Potion,
        ItemName::Map,
        ItemName::Rope,
        ItemName::Lantern,
        ItemName::Compass,
        ItemName::Scroll,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemName::Key => "KEY",
            ItemName::Torch => "TORCH",
            ItemName::Potion => "POTION",
            ItemName::Map => "MAP",
            ItemName::Rope => "ROPE",
            ItemName::Lantern => "LANTERN",
            ItemName::Compass => "COMPASS",
            ItemName::Scroll => "SCROLL",
        }
    }

    /// Case-insensitive lookup, ignoring surrounding whitespace.
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(s))
    }

    /// Position in [`ItemName::ALL`].
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive template shared by every unit of one item kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub name: ItemName,
    pub description: String,
    pub usable: bool,
    pub consumable: bool,
    pub use_text: String,
}

impl Item {
    pub fn new(name: ItemName, description: impl Into<String>) -> Self {
        Self {
            name,
            description: description.into(),
            usable: false,
            consumable: false,
            use_text: String::new(),
        }
    }

    /// Mark usable, with the line shown when used
    pub fn usable(mut self, use_text: impl Into<String>) -> Self {
        self.usable = true;
        self.use_text = use_text.into();
        self
    }

    /// Using the item spends one unit
    pub fn consumable(mut self) -> Self {
        self.consumable = true;
        self
    }

    /// Built-in template for a name. Only a few kinds are handcrafted.
    pub fn default_for(name: ItemName) -> Self {
        match name {
            ItemName::Key => Item::new(name, "A small brass key. It might open a locked door.")
                .usable("You turn the key and hear the lock click open.")
                .consumable(),
            ItemName::Torch => Item::new(name, "A burning torch that pushes back the dark.")
                .usable("The torch lights up the room."),
            ItemName::Potion => Item::new(name, "A glowing potion that clears the mind.")
                .usable("You drink the potion and feel sharper.")
                .consumable(),
            other => Item::new(other, format!("An item: {}", other.as_str())),
        }
    }
}
