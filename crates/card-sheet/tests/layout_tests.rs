use card_sheet::layout::*;
use card_sheet::*;

const A4: PageSpec = PageSpec {
    width: 210.0,
    height: 297.0,
};

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn test_cells_per_page_is_columns_times_rows() {
    for (w, h, spacing, margin) in [
        (46.0, 56.0, 0.0, 0.0),
        (40.0, 50.0, 6.0, 10.0),
        (63.0, 88.0, 3.0, 5.0),
        (20.0, 20.0, 1.5, 0.0),
    ] {
        let plan = compute_grid(A4, CellSpec::new(w, h, spacing, margin));
        assert!(plan.cells_per_page >= 1);
        assert_eq!(plan.columns * plan.rows, plan.cells_per_page);
    }
}

#[test]
fn test_oversized_card_is_degenerate() {
    let plan = compute_grid(
        PageSpec::new(100.0, 100.0),
        CellSpec::new(200.0, 50.0, 0.0, 0.0),
    );
    assert_eq!(plan.columns, 0);
    assert_eq!(plan.cells_per_page, 0);

    match plan.ensure_fits() {
        Err(CardSheetError::DegenerateLayout { columns, rows, .. }) => {
            assert_eq!(columns, 0);
            assert_eq!(rows, 2);
        }
        other => panic!("expected degenerate layout, got {:?}", other),
    }
}

#[test]
fn test_grid_is_centred() {
    for cell in [
        CellSpec::new(46.0, 56.0, 0.0, 0.0),
        CellSpec::new(40.0, 50.0, 6.0, 10.0),
        CellSpec::new(63.0, 88.0, 2.0, 30.0),
    ] {
        let plan = compute_grid(A4, cell);
        assert!(close(plan.origin_x + plan.grid_width / 2.0, A4.width / 2.0));
        assert!(close(plan.origin_y + plan.grid_height / 2.0, A4.height / 2.0));
    }
}

#[test]
fn test_margin_limits_count_not_position() {
    // 46mm cards: 4 fit with no margin, 3 with a 20mm margin
    let loose = compute_grid(A4, CellSpec::new(46.0, 56.0, 0.0, 0.0));
    let tight = compute_grid(A4, CellSpec::new(46.0, 56.0, 0.0, 20.0));

    assert_eq!(loose.columns, 4);
    assert_eq!(tight.columns, 3);
    assert!(close(tight.origin_x, (210.0 - 3.0 * 46.0) / 2.0));
}

#[test]
fn test_column_mirror_reverses_rows_and_keeps_y() {
    let plan = compute_grid(A4, CellSpec::new(46.0, 56.0, 0.0, 0.0));

    for row in 0..plan.rows {
        for col in 0..plan.columns {
            let index = row * plan.columns + col;
            let plain = placement_of(index, &plan, Mirror::NONE);
            let mirrored = placement_of(index, &plan, Mirror::COLUMNS);

            let opposite = row * plan.columns + (plan.columns - 1 - col);
            let expected = placement_of(opposite, &plan, Mirror::NONE);

            assert_eq!(mirrored.y(), plain.y());
            assert_eq!(mirrored.x(), expected.x());
        }
    }
}

#[test]
fn test_first_card_is_top_left() {
    let plan = compute_grid(A4, CellSpec::new(46.0, 56.0, 0.0, 0.0));
    let first = placement_of(0, &plan, Mirror::NONE);

    assert_eq!(first.x(), plan.origin_x);
    assert!(close(first.rect.top(), plan.origin_y + plan.grid_height));
}

#[test]
fn test_row_mirror_flips_vertically() {
    let plan = compute_grid(A4, CellSpec::new(46.0, 56.0, 0.0, 0.0));
    let mirror = Mirror {
        rows: true,
        columns: false,
    };

    let first = placement_of(0, &plan, mirror);
    assert_eq!(first.y(), plan.origin_y);
    assert_eq!(first.x(), plan.origin_x);
}

#[test]
fn test_pagination() {
    let plan = compute_grid(A4, CellSpec::new(46.0, 56.0, 0.0, 0.0));
    let k = plan.cells_per_page;

    for n in [1, k - 1, k, k + 1, 3 * k, 3 * k + 7] {
        assert_eq!(plan.pages_needed(n), n.div_ceil(k));
        let all = placements(n, &plan, Mirror::NONE);
        assert_eq!(all.len(), n);
        for p in &all {
            assert_eq!(p.page, p.index / k);
        }
    }
}

#[test]
fn test_placement_is_idempotent() {
    let cell = CellSpec::new(40.0, 50.0, 6.0, 10.0);
    let a = compute_grid(A4, cell);
    let b = compute_grid(A4, cell);
    assert_eq!(a, b);

    for i in 0..50 {
        assert_eq!(
            placement_of(i, &a, Mirror::COLUMNS),
            placement_of(i, &b, Mirror::COLUMNS)
        );
    }
}

#[test]
fn test_landscape_page() {
    let options = SheetOptions {
        orientation: Orientation::Landscape,
        ..Default::default()
    };
    let plan = compute_grid(options.page_spec(), options.cell_spec());
    // 297x210 with 46x56 cards
    assert_eq!(plan.columns, 6);
    assert_eq!(plan.rows, 3);
}
