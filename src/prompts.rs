use crate::models::Category;
use std::collections::HashMap;
use std::sync::LazyLock;

pub const QUOTE: &str = include_str!("../data/prompts/quote.txt");

static QUOTE_PROMPTS: LazyLock<HashMap<Category, String>> = LazyLock::new(|| {
    Category::ALL
        .into_iter()
        .map(|category| {
            let prompt = render(QUOTE, &[("subject", subject(category))]);
            (category, prompt.trim().to_string())
        })
        .collect()
});

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

fn subject(category: Category) -> &'static str {
    match category {
        Category::General => "a general motivational quote",
        Category::Success => {
            "a motivational quote about success, achievement, and reaching goals"
        }
        Category::Courage => "a motivational quote about courage, bravery, and overcoming fear",
        Category::Happiness => {
            "a motivational quote about happiness, joy, and living life to the fullest"
        }
        Category::Wisdom => "a motivational quote about wisdom, learning, and knowledge",
        Category::Perseverance => {
            "a motivational quote about perseverance, persistence, and never giving up"
        }
        Category::Hope => {
            "a motivational quote about hope, optimism, and looking forward to the future"
        }
    }
}

/// The fixed generation prompt for a category.
pub fn quote_prompt(category: Category) -> &'static str {
    QUOTE_PROMPTS
        .get(&category)
        .map(String::as_str)
        .unwrap_or(QUOTE)
}
