use serde::{Deserialize, Serialize};

use crate::models::{ClassData, Course, Student, Teacher};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Fields a list view searches in.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for ClassData {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.class_type.label()];
        if let Some(teacher) = &self.teacher {
            fields.push(teacher.name.as_str());
        }
        fields
    }
}

impl Searchable for Student {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.fullname.as_str(), self.username.as_str()];
        if let Some(email) = &self.email {
            fields.push(email.as_str());
        }
        fields
    }
}

impl Searchable for Teacher {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        if let Some(email) = &self.email {
            fields.push(email.as_str());
        }
        fields
    }
}

impl Searchable for Course {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

/// Case-insensitive substring filter. A blank term returns the list untouched.
pub fn filter_by_term<T: Searchable + Clone>(items: &[T], term: &str) -> Vec<T> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return items.to_vec();
    }

    items
        .iter()
        .filter(|item| {
            item.search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Offset/limit slice over an in-memory list; `page` is 0-based.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let total = items.len();
    let total_pages = if page_size == 0 {
        0
    } else {
        total.div_ceil(page_size)
    };

    let start = page.saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);

    Page {
        items: items[start..end].to_vec(),
        page,
        page_size,
        total,
        total_pages,
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub page_size: Option<usize>,
}

impl ListQuery {
    pub fn apply<T: Searchable + Clone>(&self, items: &[T]) -> Page<T> {
        let filtered = filter_by_term(items, self.search.as_deref().unwrap_or(""));
        paginate(
            &filtered,
            self.page.unwrap_or(0),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}
