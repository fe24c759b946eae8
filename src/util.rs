/// Escapes and pads the head of the remaining input for fixed-width trace lines.
pub fn formatter_str(c: &str) -> String {
    let s: String = c.chars().take(33).collect::<String>().escape_default().to_string();
    let s = s.replace("\\\"", "\"");
    let s = s.replace("\\\'", "\'");
    let s: String = s.chars().take(33).collect();
    format!("{:<35}", "|".to_string() + &s + "|")
}
