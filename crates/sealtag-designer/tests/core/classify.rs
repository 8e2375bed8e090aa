use proptest::prelude::*;
use sealtag_designer::{classify_contours, regions, Contour, ContourRole, Point2D};

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Contour {
    Contour::new(vec![
        Point2D::new(x0, y0),
        Point2D::new(x1, y0),
        Point2D::new(x1, y1),
        Point2D::new(x0, y1),
    ])
    .unwrap()
}

#[test]
fn test_outer_with_hole() {
    let outer = rect(0.0, 0.0, 10.0, 10.0);
    let hole = rect(2.0, 2.0, 4.0, 4.0).reversed();
    let classified = classify_contours(vec![hole, outer]);

    assert_eq!(classified.len(), 2);
    assert_eq!(classified[0].role, ContourRole::Outer);
    assert!(classified[0].area > 0.0);
    assert_eq!(classified[1].role, ContourRole::Hole { outer: 0 });
    assert!(classified[1].area < 0.0);
}

#[test]
fn test_orphan_hole_is_dropped() {
    let outer = rect(0.0, 0.0, 10.0, 10.0);
    let stray = rect(20.0, 20.0, 22.0, 22.0).reversed();
    let classified = classify_contours(vec![outer, stray]);
    assert_eq!(classified.len(), 1);
    assert!(classified[0].is_outer());
}

#[test]
fn test_holes_pick_their_own_outer() {
    let left = rect(0.0, 0.0, 10.0, 10.0);
    let right = rect(20.0, 0.0, 30.0, 10.0);
    let left_hole = rect(2.0, 2.0, 4.0, 4.0).reversed();
    let right_hole_a = rect(22.0, 2.0, 24.0, 4.0).reversed();
    let right_hole_b = rect(25.0, 5.0, 27.0, 7.0).reversed();
    let classified = classify_contours(vec![left, right_hole_a, right, left_hole, right_hole_b]);

    let roles: Vec<ContourRole> = classified.iter().map(|c| c.role).collect();
    assert_eq!(
        roles,
        vec![
            ContourRole::Outer,
            ContourRole::Outer,
            ContourRole::Hole { outer: 1 },
            ContourRole::Hole { outer: 0 },
            ContourRole::Hole { outer: 1 },
        ]
    );

    let grouped = regions(&classified);
    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped[0].holes.len(), 1);
    assert_eq!(grouped[1].holes.len(), 2);
}

#[test]
fn test_zero_area_is_not_outer() {
    // collinear after cleanup still has three distinct points
    let flat = Contour::new(vec![
        Point2D::new(0.0, 0.0),
        Point2D::new(1.0, 0.0),
        Point2D::new(2.0, 0.0),
    ])
    .unwrap();
    assert_eq!(flat.signed_area(), 0.0);
    assert!(classify_contours(vec![flat]).is_empty());
}

proptest! {
    #[test]
    fn prop_holes_have_outer_owners(
        boxes in prop::collection::vec(
            (-50.0f64..50.0, -50.0f64..50.0, 0.5f64..20.0, 0.5f64..20.0, any::<bool>()),
            0..12,
        ),
    ) {
        let contours: Vec<Contour> = boxes
            .iter()
            .map(|(x, y, w, h, is_hole)| {
                let r = rect(*x, *y, x + w, y + h);
                if *is_hole { r.reversed() } else { r }
            })
            .collect();
        let classified = classify_contours(contours);

        for (i, c) in classified.iter().enumerate() {
            match c.role {
                ContourRole::Outer => prop_assert!(c.area > 0.0),
                ContourRole::Hole { outer } => {
                    prop_assert!(outer < classified.len());
                    prop_assert_ne!(outer, i);
                    prop_assert!(classified[outer].is_outer());
                    prop_assert!(classified[outer].contour.contains(&c.contour.first()));
                }
            }
        }
    }
}
