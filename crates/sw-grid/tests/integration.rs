//! Integration tests for sw-grid.

use sw_grid::{
    Adjacency, AreaParams, AreaTable, GridError, Selection, StateLayout, chain_links,
    connection_matrix,
};

fn ten_areas() -> AreaTable {
    let names = [
        "Hokkaido", "Tohoku", "Tokyo", "Hokuriku", "Chubu", "Kansai", "Chugoku", "Shikoku",
        "Kyushu", "Okinawa",
    ];
    let areas = names
        .iter()
        .enumerate()
        .map(|(i, n)| AreaParams::new(*n, i + 1, 0.95, 1.0, 100.0, 0.1))
        .collect();
    AreaTable::new(areas).unwrap()
}

#[test]
fn selection_drives_layout_and_matrix() {
    let table = ten_areas();
    let selection = Selection::resolve(&[4, 5, 6], table.len()).unwrap();
    let selected = table.subset(selection.indices()).unwrap();

    let layout = StateLayout::from_counts(&selected.generator_counts());
    assert_eq!(layout.generator_counts(), &[5, 6, 7]);
    assert_eq!(layout.total_generators(), 18);
    assert_eq!(layout.angle_range(2), 11..18);

    let cmat = connection_matrix(&Adjacency::japan_ten_area(), &selection).unwrap();
    assert_eq!(cmat.nrows(), 3);
    // Chubu-Kansai and Kansai-Chugoku are neighbours
    assert!(cmat[(0, 1)] > 0.0);
    assert!(cmat[(1, 2)] > 0.0);
    assert_eq!(cmat[(0, 2)], 0.0);

    assert_eq!(chain_links(selected.len()), vec![(0, 1), (1, 2)]);
}

#[test]
fn selection_outside_adjacency_is_rejected() {
    let selection = Selection::resolve(&[0, 3], 4).unwrap();
    let err = connection_matrix(&Adjacency::isolated(2), &selection).unwrap_err();
    assert_eq!(err, GridError::AreaOutOfRange { index: 3, len: 2 });
}

#[test]
fn grid_error_messages() {
    let msg = GridError::AsymmetricAdjacency { from: 2, to: 3 }.to_string();
    assert!(msg.contains("does not list"));
    let msg = GridError::OffsetMismatch {
        area: 1,
        expected: 2,
        actual: 3,
    }
    .to_string();
    assert!(msg.contains("area 1"));
}
