/// Category frequency ranking.
use crate::category::BOTTOM_CATEGORY;
use crate::table::Table;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Rows per `bottom_category`, most frequent first, keeping the first `top_n`.
/// Equal counts keep the order in which the categories first appear.
pub fn category_counts(table: &Table, top_n: usize) -> Vec<CategoryCount> {
    let Some(column) = table.column(BOTTOM_CATEGORY) else {
        return Vec::new();
    };

    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();
    for category in column.iter().filter_map(|v| v.as_string()) {
        match positions.get(category) {
            Some(&pos) => counts[pos].count += 1,
            None => {
                positions.insert(category, counts.len());
                counts.push(CategoryCount {
                    category: category.to_string(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(top_n);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(counts: &[CategoryCount]) -> Vec<&str> {
        counts.iter().map(|c| c.category.as_str()).collect()
    }

    #[test]
    fn test_counts_descending() {
        let csv = "bottom_category\nPhones\nLaptops\nLaptops\n\nKitchen\nLaptops\nPhones\n";
        let table = Table::from_csv("t", csv.as_bytes()).unwrap();
        let counts = category_counts(&table, 10);

        assert_eq!(names(&counts), vec!["Laptops", "Phones", "Kitchen"]);
        assert_eq!(counts[0].count, 3);
        assert_eq!(counts[1].count, 2);
        assert_eq!(counts[2].count, 1);
    }

    #[test]
    fn test_counts_ties_keep_first_appearance() {
        let table = Table::from_csv("t", b"bottom_category\nB\nA\nC\nA\nB\n").unwrap();
        assert_eq!(names(&category_counts(&table, 10)), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_counts_top_n() {
        let mut csv = String::from("bottom_category\n");
        for i in 0..15 {
            for _ in 0..=i {
                csv.push_str(&format!("cat{}\n", i));
            }
        }
        let table = Table::from_csv("t", csv.as_bytes()).unwrap();
        let counts = category_counts(&table, 10);

        assert_eq!(counts.len(), 10);
        assert_eq!(counts[0].category, "cat14");
        assert_eq!(counts[0].count, 15);
        assert_eq!(counts[9].category, "cat5");
    }

    #[test]
    fn test_counts_skip_missing() {
        let table = Table::from_csv("t", b"bottom_category,x\n,1\nA,2\n").unwrap();
        let counts = category_counts(&table, 10);
        assert_eq!(counts, vec![CategoryCount { category: "A".to_string(), count: 1 }]);
    }
}
