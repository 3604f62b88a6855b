//! Static area adjacency table.

use crate::error::GridResult;
use crate::validate;

/// Raw north-to-south neighbour lists for the ten-area Japanese network.
///
/// As written the table is one-sided in places (Tokyo/Chubu, Hokuriku/Tokyo);
/// [`Adjacency::japan_ten_area`] closes it under symmetry.
const JAPAN_TEN_AREA_RAW: [&[usize]; 10] = [
    &[1],          // Hokkaido
    &[0, 2],       // Tohoku
    &[1, 4],       // Tokyo
    &[2, 5],       // Hokuriku
    &[3, 5],       // Chubu
    &[3, 4, 6, 7], // Kansai
    &[5, 8],       // Chugoku
    &[5],          // Shikoku
    &[6],          // Kyushu
    &[],           // Okinawa
];

/// Symmetric, validated neighbour lists indexed by area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjacency {
    lists: Vec<Vec<usize>>,
}

impl Adjacency {
    /// Build from neighbour lists, rejecting one-sided links.
    pub fn from_lists(lists: Vec<Vec<usize>>) -> GridResult<Self> {
        validate::validate_references(&lists)?;
        validate::validate_symmetric(&lists)?;
        Ok(Self {
            lists: normalized(lists),
        })
    }

    /// Build from neighbour lists, adding the reverse of any one-sided link.
    pub fn from_lists_symmetrized(lists: Vec<Vec<usize>>) -> GridResult<Self> {
        validate::validate_references(&lists)?;
        Ok(Self {
            lists: normalized(symmetrize(lists)),
        })
    }

    /// The built-in ten-area table (Hokkaido .. Okinawa), symmetrized.
    pub fn japan_ten_area() -> Self {
        let raw = JAPAN_TEN_AREA_RAW.iter().map(|l| l.to_vec()).collect();
        Self {
            lists: normalized(symmetrize(raw)),
        }
    }

    /// An adjacency with `len` areas and no links.
    pub fn isolated(len: usize) -> Self {
        Self {
            lists: vec![Vec::new(); len],
        }
    }

    /// Number of areas covered.
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Sorted neighbours of `area` (empty if the index is unknown).
    pub fn neighbors(&self, area: usize) -> &[usize] {
        self.lists.get(area).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
        self.neighbors(a).contains(&b)
    }

    pub fn is_symmetric(&self) -> bool {
        validate::validate_symmetric(&self.lists).is_ok()
    }

    pub fn lists(&self) -> &[Vec<usize>] {
        &self.lists
    }
}

fn symmetrize(mut lists: Vec<Vec<usize>>) -> Vec<Vec<usize>> {
    let links: Vec<(usize, usize)> = lists
        .iter()
        .enumerate()
        .flat_map(|(from, n)| n.iter().map(move |&to| (from, to)))
        .collect();
    for (from, to) in links {
        if !lists[to].contains(&from) {
            lists[to].push(from);
        }
    }
    lists
}

fn normalized(mut lists: Vec<Vec<usize>>) -> Vec<Vec<usize>> {
    for l in &mut lists {
        l.sort_unstable();
        l.dedup();
    }
    lists
}
