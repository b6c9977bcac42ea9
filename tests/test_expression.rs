// tests/test_expression.rs - Fused expression evaluation, in-place update,
// and the container properties that must hold for arbitrary contents.
//
// Run with `cargo test --test test_expression`.

use proptest::prelude::*;

use piv_image::{Error, Image, ImageExpression, Point, Rect, Size, CF, G16, G8, GF};

fn gf_image(width: u32, height: u32, values: &[f32]) -> Image<GF> {
    Image::from_vec(width, height, values.iter().map(|&v| GF(v)).collect()).unwrap()
}

/// (width, height, pixels) with 1..=48 on each side, so both storage kinds
/// are exercised.
fn g8_image() -> impl Strategy<Value = Image<G8>> {
    (1u32..=48, 1u32..=48).prop_flat_map(|(w, h)| {
        prop::collection::vec(any::<u8>(), (w * h) as usize)
            .prop_map(move |v| Image::from_vec(w, h, v.into_iter().map(G8).collect()).unwrap())
    })
}

// ===== Scenarios =====

#[test]
fn image_plus_scalar() {
    let im1 = Image::filled(200, 100, G8(127));
    let mut im2: Image<G8> = Image::default();
    im2.assign(&im1 + 5u8).unwrap();
    assert_eq!(im2.size(), Size::new(200, 100));
    assert!(im2.iter().all(|&v| v == G8(132)));
}

#[test]
fn assign_resizes_destination() {
    let a = Image::filled(40, 40, G16(2));
    let b = Image::filled(40, 40, G16(3));
    let mut c: Image<G16> = Image::new(5, 5);
    assert!(c.is_inline());
    c.assign(&a * &b + 1u16).unwrap();
    assert_eq!(c.size(), Size::new(40, 40));
    assert!(!c.is_inline());
    assert!(c.iter().all(|&v| v == G16(7)));
}

#[test]
fn constant_tree_keeps_geometry() {
    let mut c: Image<GF> = Image::new(3, 2);
    let k = piv_image::expr::ConstNode(GF(2.0));
    c.assign(k * 4.0f32).unwrap();
    assert_eq!(c.size(), Size::new(3, 2));
    assert!(c.iter().all(|&v| v == GF(8.0)));

    let empty = Image::from_expression(k + 1u8).unwrap();
    assert!(empty.is_empty());
}

#[test]
fn mismatched_leaves_are_rejected() {
    let a = Image::filled(4, 4, G8(1));
    let b = Image::filled(2, 8, G8(1));
    let mut c = Image::filled(3, 3, G8(9));
    let err = c.assign(&a + &b).unwrap_err();
    assert_eq!(
        err,
        Error::GeometryMismatch {
            left: Size::new(4, 4),
            right: Size::new(2, 8),
        }
    );
    // Destination untouched on error.
    assert_eq!(c, Image::filled(3, 3, G8(9)));
}

#[test]
fn update_in_place() {
    let mut a = gf_image(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    let b = gf_image(2, 2, &[10.0, 10.0, 10.0, 10.0]);
    a.update(|a| a * a + &b).unwrap();
    assert_eq!(a, gf_image(2, 2, &[11.0, 14.0, 19.0, 26.0]));
}

#[test]
fn update_rejects_other_geometry() {
    let mut a = Image::filled(3, 3, G8(1));
    let b = Image::filled(4, 4, G8(1));
    assert!(matches!(
        a.update(|a| a + &b),
        Err(Error::GeometryMismatch { .. })
    ));
    assert!(a.iter().all(|&v| v == G8(1)));
}

#[test]
fn update_with_view_operand() {
    let data = (0..16).map(G8).collect();
    let src = Image::from_vec(4, 4, data).unwrap();
    let window = src.view(Rect::new(Point::new(2, 2), Size::new(2, 2))).unwrap();
    let mut acc = Image::filled(2, 2, G8(100));
    acc.update(|acc| acc - window).unwrap();
    assert_eq!(acc.data(), &[G8(90), G8(89), G8(86), G8(85)]);
}

#[test]
fn modulo_on_integer_pixels() {
    let a = Image::filled(3, 3, G8(17));
    let c = Image::from_expression(&a % 5u8).unwrap();
    assert!(c.iter().all(|&v| v == G8(2)));
    let z = Image::from_expression(&a % 0u8).unwrap();
    assert!(z.iter().all(|&v| v == G8(0)));
}

#[test]
fn cast_between_pixel_types() {
    let a = Image::filled(2, 2, G16(1000));
    let b = Image::filled(2, 2, GF(0.5));
    let c = Image::from_expression((&b + a.as_expr().cast::<GF>()).cast::<G8>()).unwrap();
    // 1000.5 clamps to 255
    assert!(c.iter().all(|&v| v == G8(255)));

    let spectrum = Image::from_expression((&b * 2u8).cast::<CF>() * CF::new(0.0, 1.0)).unwrap();
    assert!(spectrum.iter().all(|&v| v == CF::new(0.0, 1.0)));
}

#[test]
fn expression_reports_size_before_evaluation() {
    let a: Image<G8> = Image::new(7, 3);
    let e = (&a + 1u8) * 2u8;
    assert_eq!(e.size(), Ok(Some(Size::new(7, 3))));
    assert_eq!(e.eval(0), G8(2));
}

// ===== Properties =====

proptest! {
    #[test]
    fn prop_resize_same_size_is_noop(img in g8_image()) {
        let mut copy = img.clone();
        copy.resize(img.width(), img.height());
        prop_assert_eq!(copy, img);
    }

    #[test]
    fn prop_single_pixel_change_breaks_equality(img in g8_image(), pick in any::<prop::sample::Index>()) {
        let mut other = img.clone();
        prop_assert_eq!(&other, &img);
        let i = pick.index(img.pixel_count());
        other[i] = G8(img[i].0.wrapping_add(1));
        prop_assert_ne!(other, img);
    }

    #[test]
    fn prop_add_then_subtract_restores_floats(
        values in prop::collection::vec(-1000i16..1000, 36),
        offsets in prop::collection::vec(-1000i16..1000, 36),
    ) {
        // Small integers are exact in f32, so (a + b) - b == a bit for bit.
        let a = Image::from_vec(6, 6, values.iter().map(|&v| GF(v as f32)).collect()).unwrap();
        let b = Image::from_vec(6, 6, offsets.iter().map(|&v| GF(v as f32)).collect()).unwrap();
        let c = Image::from_expression((&a + &b) - &b).unwrap();
        prop_assert_eq!(c, a);
    }

    #[test]
    fn prop_update_matches_fresh_assign(img in g8_image(), k in any::<u8>()) {
        let mut fresh: Image<G8> = Image::default();
        fresh.assign(&img + k).unwrap();

        let mut in_place = img.clone();
        in_place.update(|this| this + k).unwrap();
        prop_assert_eq!(in_place, fresh);
    }

    #[test]
    fn prop_gray_to_complex_has_zero_imaginary(values in prop::collection::vec(-1e6f32..1e6, 1..64)) {
        let n = values.len() as u32;
        let g = Image::from_vec(n, 1, values.iter().map(|&v| GF(v)).collect()).unwrap();
        let c: Image<CF> = Image::from(&g);
        for (src, dst) in g.iter().zip(c.iter()) {
            prop_assert_eq!(dst.im, 0.0);
            prop_assert_eq!(dst.re, src.0);
        }
    }

    #[test]
    fn prop_saturating_add_matches_scalar(img in g8_image(), k in any::<u8>()) {
        let c = Image::from_expression(&img + G8(k)).unwrap();
        for (src, dst) in img.iter().zip(c.iter()) {
            prop_assert_eq!(dst.0, src.0.saturating_add(k));
        }
    }
}
