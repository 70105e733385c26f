/// Known names close enough to `input` to be a likely typo
///
/// At most three candidates are returned, closest first.
pub fn suggest<'a>(input: &str, candidates: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let max_distance = (input.chars().count() / 3).max(2);
    let mut close: Vec<(usize, &str)> = candidates
        .into_iter()
        .filter(|c| *c != input)
        .map(|c| (edit_distance(input, c), c))
        .filter(|(d, _)| *d <= max_distance)
        .collect();
    close.sort();
    close.dedup();
    close.into_iter().take(3).map(|(_, c)| c.to_string()).collect()
}

// Levenshtein distance over chars
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == *cb {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance() {
        assert_eq!(edit_distance("width", "width"), 0);
        assert_eq!(edit_distance("widht", "width"), 2);
        assert_eq!(edit_distance("heigth", "height"), 2);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("bus_adress", "bus_address"), 1);
    }

    #[test]
    fn suggests_close_names_only() {
        let keys = ["width", "height", "bus_address", "writer"];
        assert_eq!(suggest("widht", keys), vec!["width"]);
        assert_eq!(suggest("bus_adress", keys), vec!["bus_address"]);
        assert!(suggest("brightness", keys).is_empty());
    }
}
