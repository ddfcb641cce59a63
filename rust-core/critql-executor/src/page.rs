// SPDX-License-Identifier: PMPL-1.0-or-later
//! Pagination and sort parameters.

use serde::{Deserialize, Serialize};

use critql_query::SortDirection;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl From<Direction> for SortDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Asc => SortDirection::Ascending,
            Direction::Desc => SortDirection::Descending,
        }
    }
}

/// One sort key: an entity property and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub property: String,
    pub direction: Direction,
}

impl Order {
    pub fn asc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Desc,
        }
    }
}

/// Ordered sort keys; the first key is the primary one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    orders: Vec<Order>,
}

impl Sort {
    pub fn unsorted() -> Self {
        Self::default()
    }

    /// Sort by `properties` in order, all in one direction.
    pub fn by<S: Into<String>>(direction: Direction, properties: impl IntoIterator<Item = S>) -> Self {
        Self {
            orders: properties
                .into_iter()
                .map(|property| Order {
                    property: property.into(),
                    direction,
                })
                .collect(),
        }
    }

    pub fn and(mut self, order: Order) -> Self {
        self.orders.push(order);
        self
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn is_unsorted(&self) -> bool {
        self.orders.is_empty()
    }
}

impl From<Order> for Sort {
    fn from(order: Order) -> Self {
        Self {
            orders: vec![order],
        }
    }
}

/// A page request: zero-based offset, page size and sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pageable {
    pub offset: usize,
    pub page_size: usize,
    #[serde(default)]
    pub sort: Sort,
}

impl Pageable {
    /// Page `page` (zero-based) of `page_size` results.
    pub fn of(page: usize, page_size: usize) -> Self {
        Self {
            offset: page.saturating_mul(page_size),
            page_size,
            sort: Sort::unsorted(),
        }
    }

    pub fn with_sort(mut self, sort: impl Into<Sort>) -> Self {
        self.sort = sort.into();
        self
    }

    pub fn page_number(&self) -> usize {
        if self.page_size == 0 {
            0
        } else {
            self.offset / self.page_size
        }
    }

    pub fn next(&self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.page_size),
            page_size: self.page_size,
            sort: self.sort.clone(),
        }
    }
}

/// One window of results plus the total match count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub offset: usize,
    pub page_size: usize,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, offset: usize, page_size: usize, total: u64) -> Self {
        Self {
            content,
            offset,
            page_size,
            total,
        }
    }

    pub fn empty(offset: usize, page_size: usize) -> Self {
        Self::new(Vec::new(), offset, page_size, 0)
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Zero-based page number.
    pub fn number(&self) -> usize {
        if self.page_size == 0 {
            0
        } else {
            self.offset / self.page_size
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return if self.total == 0 { 0 } else { 1 };
        }
        self.total.div_ceil(self.page_size as u64)
    }

    pub fn has_next(&self) -> bool {
        ((self.offset + self.content.len()) as u64) < self.total
    }

    pub fn has_previous(&self) -> bool {
        self.offset > 0
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            offset: self.offset,
            page_size: self.page_size,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pageable_of() {
        let p = Pageable::of(2, 10);
        assert_eq!(p.offset, 20);
        assert_eq!(p.page_number(), 2);
        assert_eq!(p.next().offset, 30);
    }

    #[test]
    fn test_page_arithmetic() {
        let page = Page::new(vec![1, 2, 3], 3, 3, 7);
        assert_eq!(page.number(), 1);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
        assert!(page.has_previous());

        let last = Page::new(vec![7], 6, 3, 7);
        assert!(!last.has_next());
    }

    #[test]
    fn test_page_map() {
        let page = Page::new(vec![1, 2], 0, 2, 2).map(|n| n * 10);
        assert_eq!(page.content, vec![10, 20]);
        assert_eq!(page.total, 2);
    }

    #[test]
    fn test_sort_builders() {
        let sort = Sort::by(Direction::Desc, ["age", "name"]).and(Order::asc("gender"));
        assert_eq!(sort.orders().len(), 3);
        assert_eq!(sort.orders()[1], Order::desc("name"));
        assert!(!sort.is_unsorted());
        assert!(Sort::unsorted().is_unsorted());
    }

    #[test]
    fn test_direction_converts() {
        assert_eq!(SortDirection::from(Direction::Desc), SortDirection::Descending);
    }
}
