//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

// ============================================================================
// Paths and Links
// ============================================================================

pub mod link {
    pub fn permalink() -> String {
        "/{year}/{month}/{day}/{title}.html".into()
    }

    pub fn sources() -> String {
        "{year}-{month}-{day}-{title}.html".into()
    }

    pub fn taglink() -> String {
        "tags/{tag}.html".into()
    }

    pub fn year() -> String {
        "/{year}.html".into()
    }

    pub fn month() -> String {
        "/{year}/{month}.html".into()
    }

    pub fn day() -> String {
        "/{year}/{month}/{day}.html".into()
    }

    pub fn page() -> String {
        "page/{num}".into()
    }
}

// ============================================================================
// Articles
// ============================================================================

pub mod article {
    pub fn layout() -> String {
        "layout".into()
    }

    pub fn summary_separator() -> String {
        r"READMORE".into()
    }

    pub fn summary_length() -> usize {
        250
    }

    pub fn per_page() -> usize {
        10
    }

    pub fn time_zone() -> String {
        "UTC".into()
    }

    pub fn default_extension() -> String {
        ".md".into()
    }
}
