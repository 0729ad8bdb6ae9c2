//! Table reconstruction tests over the public API, using literal ruling and cell fixtures.

use std::sync::Arc;

use tabgrid_core::TableError;
use tabgrid_core::table::{
    Cell, Extraction, PageInput, Rectangle, Ruling, TableSettings, TextElement, bounding_box_of,
    find_cells, find_intersections, find_regions, sort_reading_order,
};

// Cell fixtures as (top, left, width, height).
const CELLS: &[(f64, f64, f64, f64)] = &[
    (40.0, 18.0, 208.0, 4.0),
    (44.0, 18.0, 52.0, 6.0),
    (50.0, 18.0, 52.0, 4.0),
    (54.0, 18.0, 52.0, 6.0),
    (60.0, 18.0, 52.0, 4.0),
    (64.0, 18.0, 52.0, 6.0),
    (70.0, 18.0, 52.0, 4.0),
    (74.0, 18.0, 52.0, 6.0),
    (90.0, 18.0, 52.0, 4.0),
    (94.0, 18.0, 52.0, 6.0),
    (100.0, 18.0, 52.0, 28.0),
    (128.0, 18.0, 52.0, 4.0),
    (132.0, 18.0, 52.0, 64.0),
    (196.0, 18.0, 52.0, 66.0),
    (262.0, 18.0, 52.0, 4.0),
    (266.0, 18.0, 52.0, 84.0),
    (350.0, 18.0, 52.0, 4.0),
    (354.0, 18.0, 52.0, 32.0),
    (386.0, 18.0, 52.0, 38.0),
    (424.0, 18.0, 52.0, 18.0),
    (442.0, 18.0, 52.0, 74.0),
    (516.0, 18.0, 52.0, 28.0),
    (544.0, 18.0, 52.0, 4.0),
    (44.0, 70.0, 156.0, 6.0),
    (50.0, 70.0, 156.0, 4.0),
    (54.0, 70.0, 156.0, 6.0),
    (60.0, 70.0, 156.0, 4.0),
    (64.0, 70.0, 156.0, 6.0),
    (70.0, 70.0, 156.0, 4.0),
    (74.0, 70.0, 156.0, 6.0),
    (84.0, 70.0, 2.0, 6.0),
    (90.0, 70.0, 156.0, 4.0),
    (94.0, 70.0, 156.0, 6.0),
    (100.0, 70.0, 156.0, 28.0),
    (128.0, 70.0, 156.0, 4.0),
    (132.0, 70.0, 156.0, 64.0),
    (196.0, 70.0, 156.0, 66.0),
    (262.0, 70.0, 156.0, 4.0),
    (266.0, 70.0, 156.0, 84.0),
    (350.0, 70.0, 156.0, 4.0),
    (354.0, 70.0, 156.0, 32.0),
    (386.0, 70.0, 156.0, 38.0),
    (424.0, 70.0, 156.0, 18.0),
    (442.0, 70.0, 156.0, 74.0),
    (516.0, 70.0, 156.0, 28.0),
    (544.0, 70.0, 156.0, 4.0),
    (84.0, 72.0, 446.0, 6.0),
    (90.0, 226.0, 176.0, 4.0),
    (94.0, 226.0, 176.0, 6.0),
    (100.0, 226.0, 176.0, 28.0),
    (128.0, 226.0, 176.0, 4.0),
    (132.0, 226.0, 176.0, 64.0),
    (196.0, 226.0, 176.0, 66.0),
    (262.0, 226.0, 176.0, 4.0),
    (266.0, 226.0, 176.0, 84.0),
    (350.0, 226.0, 176.0, 4.0),
    (354.0, 226.0, 176.0, 32.0),
    (386.0, 226.0, 176.0, 38.0),
    (424.0, 226.0, 176.0, 18.0),
    (442.0, 226.0, 176.0, 74.0),
    (516.0, 226.0, 176.0, 28.0),
    (544.0, 226.0, 176.0, 4.0),
    (90.0, 402.0, 116.0, 4.0),
    (94.0, 402.0, 116.0, 6.0),
    (100.0, 402.0, 116.0, 28.0),
    (128.0, 402.0, 116.0, 4.0),
    (132.0, 402.0, 116.0, 64.0),
    (196.0, 402.0, 116.0, 66.0),
    (262.0, 402.0, 116.0, 4.0),
    (266.0, 402.0, 116.0, 84.0),
    (350.0, 402.0, 116.0, 4.0),
    (354.0, 402.0, 116.0, 32.0),
    (386.0, 402.0, 116.0, 38.0),
    (424.0, 402.0, 116.0, 18.0),
    (442.0, 402.0, 116.0, 74.0),
    (516.0, 402.0, 116.0, 28.0),
    (544.0, 402.0, 116.0, 4.0),
    (84.0, 518.0, 246.0, 6.0),
    (90.0, 518.0, 186.0, 4.0),
    (94.0, 518.0, 186.0, 6.0),
    (100.0, 518.0, 186.0, 28.0),
    (128.0, 518.0, 186.0, 4.0),
    (132.0, 518.0, 186.0, 64.0),
    (196.0, 518.0, 186.0, 66.0),
    (262.0, 518.0, 186.0, 4.0),
    (266.0, 518.0, 186.0, 84.0),
    (350.0, 518.0, 186.0, 4.0),
    (354.0, 518.0, 186.0, 32.0),
    (386.0, 518.0, 186.0, 38.0),
    (424.0, 518.0, 186.0, 18.0),
    (442.0, 518.0, 186.0, 74.0),
    (516.0, 518.0, 186.0, 28.0),
    (544.0, 518.0, 186.0, 4.0),
    (90.0, 704.0, 60.0, 4.0),
    (94.0, 704.0, 60.0, 6.0),
    (100.0, 704.0, 60.0, 28.0),
    (128.0, 704.0, 60.0, 4.0),
    (132.0, 704.0, 60.0, 64.0),
    (196.0, 704.0, 60.0, 66.0),
    (262.0, 704.0, 60.0, 4.0),
    (266.0, 704.0, 60.0, 84.0),
    (350.0, 704.0, 60.0, 4.0),
    (354.0, 704.0, 60.0, 32.0),
    (386.0, 704.0, 60.0, 38.0),
    (424.0, 704.0, 60.0, 18.0),
    (442.0, 704.0, 60.0, 74.0),
    (516.0, 704.0, 60.0, 28.0),
    (544.0, 704.0, 60.0, 4.0),
    (84.0, 764.0, 216.0, 6.0),
    (90.0, 764.0, 216.0, 4.0),
    (94.0, 764.0, 216.0, 6.0),
    (100.0, 764.0, 216.0, 28.0),
    (128.0, 764.0, 216.0, 4.0),
    (132.0, 764.0, 216.0, 64.0),
    (196.0, 764.0, 216.0, 66.0),
    (262.0, 764.0, 216.0, 4.0),
    (266.0, 764.0, 216.0, 84.0),
    (350.0, 764.0, 216.0, 4.0),
    (354.0, 764.0, 216.0, 32.0),
    (386.0, 764.0, 216.0, 38.0),
    (424.0, 764.0, 216.0, 18.0),
    (442.0, 764.0, 216.0, 74.0),
    (516.0, 764.0, 216.0, 28.0),
    (544.0, 764.0, 216.0, 4.0),
];

const EXPECTED_CELLS: &[(f64, f64, f64, f64)] = &[
    (40.0, 18.0, 208.0, 4.0),
    (44.0, 18.0, 52.0, 6.0),
    (50.0, 18.0, 52.0, 4.0),
    (54.0, 18.0, 52.0, 6.0),
    (60.0, 18.0, 52.0, 4.0),
    (64.0, 18.0, 52.0, 6.0),
    (70.0, 18.0, 52.0, 4.0),
    (74.0, 18.0, 52.0, 6.0),
    (44.0, 70.0, 156.0, 6.0),
    (50.0, 70.0, 156.0, 4.0),
    (54.0, 70.0, 156.0, 6.0),
    (60.0, 70.0, 156.0, 4.0),
    (64.0, 70.0, 156.0, 6.0),
    (70.0, 70.0, 156.0, 4.0),
    (74.0, 70.0, 156.0, 6.0),
];

const HORIZONTAL_YS: [f64; 9] = [40.0, 44.0, 50.0, 54.0, 60.0, 64.0, 70.0, 74.0, 80.0];

fn horizontal_rulings() -> Vec<Ruling> {
    HORIZONTAL_YS
        .iter()
        .map(|&y| Ruling::horizontal(y, 18.0, 226.0))
        .collect()
}

fn vertical_rulings() -> Vec<Ruling> {
    vec![
        Ruling::vertical(18.0, 40.0, 80.0),
        Ruling::vertical(70.0, 44.0, 80.0),
        Ruling::vertical(226.0, 40.0, 80.0),
    ]
}

fn cells(fixture: &[(f64, f64, f64, f64)]) -> Vec<Cell> {
    fixture
        .iter()
        .map(|&(top, left, width, height)| Cell::new(top, left, width, height))
        .collect()
}

fn sort_spatially(cells: &mut [Cell]) {
    cells.sort_by(|a, b| {
        a.bounds
            .top()
            .total_cmp(&b.bounds.top())
            .then(a.bounds.left().total_cmp(&b.bounds.left()))
    });
}

#[test]
fn test_lines_to_cells() {
    let mut found = find_cells(
        &horizontal_rulings(),
        &vertical_rulings(),
        &TableSettings::default(),
    );
    let mut expected = cells(EXPECTED_CELLS);
    sort_spatially(&mut found);
    sort_spatially(&mut expected);
    assert_eq!(found, expected);
}

#[test]
fn test_stacked_cells_match_ruling_bands() {
    let found = find_cells(
        &horizontal_rulings(),
        &vertical_rulings(),
        &TableSettings::default(),
    );
    let mut left_column: Vec<&Cell> = found
        .iter()
        .filter(|c| c.bounds.left() == 18.0 && c.bounds.width() == 52.0)
        .collect();
    left_column.sort_by(|a, b| a.bounds.top().total_cmp(&b.bounds.top()));
    let heights: Vec<f64> = left_column.iter().map(|c| c.bounds.height()).collect();
    assert_eq!(heights, vec![6.0, 4.0, 6.0, 4.0, 6.0, 4.0, 6.0]);
}

#[test]
fn test_find_spreadsheets_from_cells() {
    let regions = find_regions(&cells(CELLS));
    assert_eq!(
        regions,
        vec![
            Rectangle::new(40.0, 18.0, 208.0, 40.0),
            Rectangle::new(84.0, 18.0, 962.0, 464.0),
        ]
    );
}

#[test]
fn test_regions_ignore_input_order() {
    let mut shuffled = cells(CELLS);
    shuffled.reverse();
    shuffled.rotate_left(37);
    assert_eq!(find_regions(&shuffled), find_regions(&cells(CELLS)));
}

#[test]
fn test_almost_intersecting_rulings_should_intersect() {
    let v = Ruling::from_points((555.960876, 271.569641), (555.960876, 786.899902));
    let h = Ruling::from_points((25.620499, 786.899902), (555.960754, 786.899902));
    let intersections = find_intersections(&[h], &[v], TableSettings::default().intersection_tolerance);
    assert_eq!(intersections.len(), 1);
}

#[test]
fn test_extract_lines_fixture() {
    let mut rulings = horizontal_rulings();
    rulings.extend(vertical_rulings());
    let page = PageInput {
        rulings,
        text: vec![
            TextElement::new(Rectangle::new(40.5, 100.0, 30.0, 3.0), "Header"),
            TextElement::new(Rectangle::new(45.0, 20.0, 10.0, 4.0), "a1"),
            TextElement::new(Rectangle::new(45.0, 80.0, 10.0, 4.0), "b1"),
        ],
        ..PageInput::default()
    };
    let extraction = tabgrid_core::table::extract_tables(&page, &TableSettings::default());

    let summary = *extraction.summary();
    assert_eq!(summary.horizontal_rulings, 9);
    assert_eq!(summary.vertical_rulings, 3);
    assert_eq!(summary.cell_count, 15);
    assert_eq!(summary.regions, 1);

    let Extraction::Grid { tables, .. } = extraction else {
        panic!("expected a grid");
    };
    let table = &tables[0];
    assert_eq!(table.bounds(), Rectangle::new(40.0, 18.0, 208.0, 40.0));
    assert_eq!(table.row_count(), 8);
    assert_eq!(table.col_count(), 2);
    assert_eq!(table.col_boundaries(), &[18.0, 70.0, 226.0]);

    let header = table.rows()[0][0].as_ref().unwrap();
    let same = table.rows()[0][1].as_ref().unwrap();
    assert!(Arc::ptr_eq(header, same));
    assert_eq!(table.text(0, 0), "Header");
    assert_eq!(table.text(0, 1), "Header");
    assert_eq!(table.text(1, 0), "a1");
    assert_eq!(table.text(1, 1), "b1");
    assert_eq!(table.spans().len(), 1);
    assert_eq!(table.spans()[0].col_span, 2);
}

#[test]
fn test_reading_order_sort_is_idempotent() {
    let mut rects: Vec<Rectangle> = cells(CELLS).iter().map(|c| c.bounds).collect();
    rects.reverse();
    sort_reading_order(&mut rects, 0.4);
    let once = rects.clone();
    sort_reading_order(&mut rects, 0.4);
    assert_eq!(rects, once);
}

#[test]
fn test_overlap_ratio_symmetric_over_fixture() {
    let rects: Vec<Rectangle> = cells(CELLS).iter().map(|c| c.bounds).collect();
    for a in &rects {
        for b in &rects {
            let ab = a.overlap_ratio(b);
            assert_eq!(ab, b.overlap_ratio(a));
            assert!((0.0..=1.0).contains(&ab));
        }
    }
}

#[test]
fn test_bounding_box_of_empty_fails() {
    let empty: Vec<Cell> = Vec::new();
    assert_eq!(bounding_box_of(&empty), Err(TableError::EmptyInput));
    assert_eq!(
        bounding_box_of(&cells(EXPECTED_CELLS)),
        Ok(Rectangle::new(40.0, 18.0, 208.0, 40.0))
    );
}
