use crate::models::Category;

/// Two-stop linear gradient used as a category's visual theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gradient {
    pub start: &'static str,
    pub end: &'static str,
}

pub fn gradient(category: Category) -> Gradient {
    let (start, end) = match category {
        Category::General => ("#667eea", "#764ba2"),
        Category::Success => ("#f093fb", "#f5576c"),
        Category::Courage => ("#fa709a", "#fee140"),
        Category::Happiness => ("#f6d365", "#fda085"),
        Category::Wisdom => ("#30cfd0", "#330867"),
        Category::Perseverance => ("#ff9a9e", "#a18cd1"),
        Category::Hope => ("#4facfe", "#00f2fe"),
    };
    Gradient { start, end }
}

impl Gradient {
    /// CSS `linear-gradient` value.
    pub fn css(&self) -> String {
        format!("linear-gradient(135deg, {} 0%, {} 100%)", self.start, self.end)
    }
}
