/// A keyboard layout as three rows of key names.
#[derive(Debug, PartialEq, Eq)]
pub struct Scheme {
    pub id: &'static str,
    pub name: &'static str,
    pub row1: &'static [&'static str],
    pub row2: &'static [&'static str],
    pub row3: &'static [&'static str],
}

impl Scheme {
    pub fn rows(&self) -> [&'static [&'static str]; 3] {
        [self.row1, self.row2, self.row3]
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rows().into_iter().flat_map(|row| row.iter().copied())
    }
}

/// Known schemes. The first one is the default.
pub const SCHEMES: &[Scheme] = &[
    Scheme {
        id: "qwerty",
        name: "QWERTY",
        row1: &["q", "w", "e", "r", "t", "y", "u", "i", "o", "p"],
        row2: &["a", "s", "d", "f", "g", "h", "j", "k", "l"],
        row3: &["z", "x", "c", "v", "b", "n", "m"],
    },
    Scheme {
        id: "dvorak",
        name: "Dvorak",
        row1: &["'", ",", ".", "p", "y", "f", "g", "c", "r", "l"],
        row2: &["a", "o", "e", "u", "i", "d", "h", "t", "n", "s"],
        row3: &[";", "q", "j", "k", "x", "b", "m", "w", "v", "z"],
    },
    Scheme {
        id: "colemak",
        name: "Colemak",
        row1: &["q", "w", "f", "p", "g", "j", "l", "u", "y"],
        row2: &["a", "r", "s", "t", "d", "h", "n", "e", "i", "o"],
        row3: &["z", "x", "c", "v", "b", "k", "m"],
    },
];

pub fn default_scheme() -> &'static Scheme {
    &SCHEMES[0]
}

/// Look up a scheme by id. Unknown ids resolve to the default scheme.
pub fn find_scheme(id: &str) -> &'static Scheme {
    SCHEMES
        .iter()
        .find(|scheme| scheme.id == id)
        .unwrap_or_else(default_scheme)
}

pub fn is_known_scheme(id: &str) -> bool {
    SCHEMES.iter().any(|scheme| scheme.id == id)
}

pub fn scheme_ids() -> Vec<&'static str> {
    SCHEMES.iter().map(|scheme| scheme.id).collect()
}

/// Every key referenced by any scheme, deduplicated, in first-seen order.
pub fn all_scheme_keys() -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = Vec::new();
    for key in SCHEMES.iter().flat_map(|scheme| scheme.keys()) {
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}
