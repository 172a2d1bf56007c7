use crate::models::OccasionTheme;

pub const OUTFIT_INSTRUCTION: &str = include_str!("../data/prompts/outfit_instruction.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

/// Fixed styling hint appended to the instruction for each theme.
pub fn theme_guidance(theme: OccasionTheme) -> &'static str {
    match theme {
        OccasionTheme::Casual => {
            "relaxed and comfortable, everyday layers, clean sneakers or easy flats"
        }
        OccasionTheme::Business => {
            "polished office wear, tailored fits, neutral palette, structured shoes"
        }
        OccasionTheme::DateNight => {
            "elevated and flattering, one statement piece, warm evening tones"
        }
        OccasionTheme::Party => {
            "bold and fun, night-out textures like satin or leather, standout accessories"
        }
        OccasionTheme::Formal => {
            "black-tie ready, refined tailoring or gown-level elegance, formal footwear"
        }
        OccasionTheme::Gym => {
            "performance athleisure, breathable fabrics, trainers, sporty accessories"
        }
    }
}
