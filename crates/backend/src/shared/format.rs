/// Thousands-separated integer formatting for log output, using the
/// same space separator as the frontend's table formatting.
pub fn format_number(n: usize) -> String {
    let digits: Vec<char> = n.to_string().chars().rev().collect();
    let mut grouped = String::new();
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(*ch);
    }
    grouped.chars().rev().collect()
}
