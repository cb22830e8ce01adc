use std::io::Write;

use tinct::{Config, Error, NameKind};

const STUDIO_CONFIG: &str = "
version: 1
roles:
  scene_linear: lin_srgb
  color_timing: acescct
colorspaces:
  - name: lin_srgb
    primaries: srgb
    transfer: linear
  - name: srgb
    primaries: srgb
    transfer: srgb
  - name: acescg
    primaries: aces-cg
    transfer: linear
  - name: acescct
    primaries: aces-cg
    transfer: aces_cct
  - name: rec2020_g24
    primaries: rec2020
    transfer: gamma24
displays:
  - name: sRGB
    views:
      - name: Standard
        colorspace: srgb
      - name: Raw
        colorspace: lin_srgb
  - name: Rec2020
    views:
      - name: Standard
        colorspace: rec2020_g24
";

fn load_test_config() -> Config {
    Config::from_yaml(STUDIO_CONFIG).expect("test config should load")
}

fn assert_close3(actual: [f32; 3], expected: [f32; 3], tol: f32) {
    for i in 0..3 {
        let diff = (actual[i] - expected[i]).abs();
        assert!(
            diff <= tol,
            "channel {} mismatch: got {}, expected {}, diff {} > {}",
            i,
            actual[i],
            expected[i],
            diff,
            tol
        );
    }
}

#[test]
fn config_loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(STUDIO_CONFIG.as_bytes()).expect("write config");

    let config = Config::from_file(file.path()).expect("config should load from file");
    assert_eq!(config.displays(), vec!["sRGB", "Rec2020"]);
}

#[test]
fn missing_file_is_a_read_error() {
    let err = Config::from_file("/nonexistent/config.yaml".as_ref()).unwrap_err();
    assert!(matches!(err, Error::Read { .. }));
}

#[test]
fn display_enumeration_is_deterministic() {
    let a = load_test_config();
    let b = load_test_config();
    assert_eq!(a.displays(), b.displays());
    assert_eq!(a.views("sRGB").unwrap(), b.views("sRGB").unwrap());
    assert_eq!(a.views("sRGB").unwrap(), vec!["Standard", "Raw"]);
}

#[test]
fn every_declared_display_view_pair_builds() {
    let config = load_test_config();
    for display in config.displays() {
        for view in config.views(display).unwrap() {
            let processor = config
                .display_view_processor(display, view)
                .unwrap_or_else(|e| panic!("{display}/{view} should build: {e}"));
            assert_eq!(processor.src(), "lin_srgb");
        }
    }
}

#[test]
fn unknown_display_and_view_are_distinct_errors() {
    let config = load_test_config();

    let err = config.views("P3").unwrap_err();
    assert!(matches!(
        err,
        Error::UnknownName {
            kind: NameKind::Display,
            ..
        }
    ));

    let err = config.display_view_processor("sRGB", "Filmic").unwrap_err();
    assert!(matches!(
        err,
        Error::UnknownName {
            kind: NameKind::View,
            ..
        }
    ));
}

#[test]
fn display_view_processor_needs_the_scene_linear_role() {
    let text = "
version: 1
colorspaces:
  - name: srgb
    primaries: srgb
    transfer: srgb
displays:
  - name: sRGB
    views:
      - name: Standard
        colorspace: srgb
";
    let config = Config::from_yaml(text).expect("config without roles should load");
    let err = config.display_view_processor("sRGB", "Standard").unwrap_err();
    assert!(matches!(
        err,
        Error::UnknownName {
            kind: NameKind::Role,
            ..
        }
    ));
}

#[test]
fn unknown_color_space_never_yields_a_processor() {
    let config = load_test_config();
    let err = config.processor("nonexistent", "lin_srgb").unwrap_err();
    assert!(matches!(
        err,
        Error::UnknownName {
            kind: NameKind::ColorSpace,
            ..
        }
    ));
}

#[test]
fn same_space_processor_reports_noop_and_is_identity() {
    let config = load_test_config();
    let cpu = config.processor("lin_srgb", "lin_srgb").unwrap().cpu();
    assert!(cpu.is_noop(), "same-space processor should be no-op");

    let mut px = [0.18_f32, 0.5, 0.9];
    cpu.apply_pixel(&mut px);
    assert_close3(px, [0.18, 0.5, 0.9], 1e-6);
}

#[test]
fn roundtrip_via_scene_linear_is_stable() {
    let config = load_test_config();
    let scene_linear = config.role("scene_linear").unwrap();

    for src in ["srgb", "acescg", "acescct", "rec2020_g24"] {
        let to_working = config.processor(src, scene_linear).unwrap().cpu();
        let back = config.processor(scene_linear, src).unwrap().cpu();

        let samples = [
            [0.18_f32, 0.18, 0.18],
            [0.5_f32, 0.2, 0.8],
            [0.9_f32, 0.4, 0.1],
        ];

        for expected in samples {
            let mut px = expected;
            to_working.apply_pixel(&mut px);
            back.apply_pixel(&mut px);
            assert_close3(px, expected, 0.001);
        }
    }
}

#[test]
fn display_transform_moves_mid_gray_and_stays_finite() {
    let config = load_test_config();
    let cpu = config.display_view_processor("sRGB", "Standard").unwrap().cpu();

    let mut px = [0.18_f32, 0.18, 0.18];
    cpu.apply_pixel(&mut px);

    assert!(px.iter().all(|v| v.is_finite()));
    assert!(
        (px[0] - 0.18).abs() > 0.01,
        "sRGB encode should move mid-gray, got {px:?}"
    );
    // 0.18 linear encodes to ~0.4613 sRGB
    assert_close3(px, [0.46135613, 0.46135613, 0.46135613], 1e-4);
}

#[test]
fn processor_outlives_its_config() {
    let cpu = {
        let config = load_test_config();
        config.processor("lin_srgb", "srgb").unwrap().cpu()
    };
    let mut px = [0.18_f32, 0.18, 0.18];
    cpu.apply_pixel(&mut px);
    assert!(px[0] > 0.4);
}

#[test]
fn apply_rgba_with_mismatched_dimensions_is_a_noop() {
    let config = load_test_config();
    let cpu = config.processor("lin_srgb", "srgb").unwrap().cpu();

    let sentinel = [[0.25_f32, 0.5, 0.75, 1.0]; 4];
    let mut pixels = sentinel;
    cpu.apply_rgba(&mut pixels, 3, 3);
    assert_eq!(pixels, sentinel, "mismatched dimensions must not mutate");

    cpu.apply_rgba(&mut pixels, 2, 2);
    assert!(pixels != sentinel, "matching dimensions must transform");
    for px in &pixels {
        assert_eq!(px[3], 1.0, "alpha must be untouched");
    }
}

#[test]
fn lut_bake_has_expected_size_and_identity_corners() {
    let config = load_test_config();
    let cpu = config.processor("lin_srgb", "lin_srgb").unwrap().cpu();

    let size = 17_u32;
    let lut = cpu.bake_3d_lut(size);
    assert_eq!(lut.len(), size as usize * size as usize * size as usize);

    assert_close3([lut[0][0], lut[0][1], lut[0][2]], [0.0, 0.0, 0.0], 0.0001);

    let mid = (size / 2) as usize;
    let mid_index = mid * size as usize * size as usize + mid * size as usize + mid;
    assert_close3(
        [lut[mid_index][0], lut[mid_index][1], lut[mid_index][2]],
        [0.5, 0.5, 0.5],
        0.0001,
    );

    let last = lut.len() - 1;
    assert_close3(
        [lut[last][0], lut[last][1], lut[last][2]],
        [1.0, 1.0, 1.0],
        0.0001,
    );
}

#[test]
fn concurrent_apply_on_shared_processor_is_consistent() {
    let config = load_test_config();
    let cpu = config.processor("acescg", "srgb").unwrap().cpu();

    let mut reference = [0.18_f32, 0.4, 0.7];
    cpu.apply_pixel(&mut reference);

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..1000 {
                    let mut px = [0.18_f32, 0.4, 0.7];
                    cpu.apply_pixel(&mut px);
                    assert_eq!(px, reference);
                }
            });
        }
    });
}
