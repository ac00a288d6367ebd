use bevy::color::Hsva;
use bevy::prelude::*;

use super::color::HexColor;

/// HSV working copy behind the color picker widget.
///
/// Kept separately from the stored hex value so hue survives while the user
/// drags through fully desaturated or black colors.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct PickerModel {
    pub hsva: Hsva,
}

impl Default for PickerModel {
    fn default() -> Self {
        Self::from_hex(HexColor::WHITE)
    }
}

impl PickerModel {
    pub fn from_hex(color: HexColor) -> Self {
        Self { hsva: color.to_hsva() }
    }

    pub fn to_hex(&self) -> HexColor {
        HexColor::from_hsva(self.hsva)
    }

    /// Re-syncs from the store unless the store already holds what this
    /// model produces. Returns `true` when the model changed.
    pub fn sync(&mut self, color: HexColor) -> bool {
        if self.to_hex() == color {
            return false;
        }
        let hue = self.hsva.hue;
        self.hsva = color.to_hsva();
        if self.hsva.saturation == 0.0 || self.hsva.value == 0.0 {
            self.hsva.hue = hue;
        }
        true
    }

    /// `unit` is the pointer position inside the saturation/value square,
    /// (0, 0) top-left.
    pub fn set_saturation_value(&mut self, unit: Vec2) {
        let unit = unit.clamp(Vec2::ZERO, Vec2::ONE);
        self.hsva.saturation = unit.x;
        self.hsva.value = 1.0 - unit.y;
    }

    /// `x` is the pointer position along the hue strip, 0 at the left edge.
    pub fn set_hue(&mut self, x: f32) {
        self.hsva.hue = x.clamp(0.0, 1.0) * 360.0;
    }

    /// Marker position inside the saturation/value square, in percent.
    pub fn saturation_value_marker(&self) -> Vec2 {
        Vec2::new(self.hsva.saturation, 1.0 - self.hsva.value) * 100.0
    }

    pub fn hue_marker(&self) -> f32 {
        self.hsva.hue / 360.0 * 100.0
    }
}

/// Converts a node-relative pointer position (origin at the node center,
/// ±0.5 at the edges) to unit coordinates with the origin top-left.
pub fn unit_from_centered(normalized: Vec2) -> Vec2 {
    (normalized + Vec2::splat(0.5)).clamp(Vec2::ZERO, Vec2::ONE)
}

/// RGBA8 texels of the saturation/value square for `hue`, `size`×`size`.
pub fn saturation_value_texels(hue: f32, size: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    let span = (size.max(2) - 1) as f32;
    for y in 0..size {
        for x in 0..size {
            let c = HexColor::from_hsva(Hsva::new(hue, x as f32 / span, 1.0 - y as f32 / span, 1.0));
            data.extend_from_slice(&[c.r, c.g, c.b, 255]);
        }
    }
    data
}

/// RGBA8 texels of the horizontal hue strip, `width`×1.
pub fn hue_texels(width: u32) -> Vec<u8> {
    let span = (width.max(2) - 1) as f32;
    (0..width)
        .flat_map(|x| {
            let c = HexColor::from_hsva(Hsva::new(x as f32 / span * 360.0, 1.0, 1.0, 1.0));
            [c.r, c.g, c.b, 255]
        })
        .collect()
}

/// Swatches offered under the picker.
pub const PRESETS: [HexColor; 8] = [
    HexColor::WHITE,
    HexColor::rgb(0x1f, 0x1f, 0x1f),
    HexColor::rgb(0xe6, 0x39, 0x46),
    HexColor::rgb(0xf4, 0xa2, 0x61),
    HexColor::rgb(0xe9, 0xc4, 0x6a),
    HexColor::rgb(0x2a, 0x9d, 0x8f),
    HexColor::rgb(0x45, 0x7b, 0x9d),
    HexColor::rgb(0x6d, 0x59, 0x7a),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_corners() {
        let mut model = PickerModel::from_hex(HexColor::rgb(255, 0, 0));
        model.set_saturation_value(Vec2::new(0.0, 0.0));
        assert_eq!(model.to_hex(), HexColor::WHITE);
        model.set_saturation_value(Vec2::new(1.0, 0.0));
        assert_eq!(model.to_hex(), HexColor::rgb(255, 0, 0));
        model.set_saturation_value(Vec2::new(0.3, 1.0));
        assert_eq!(model.to_hex(), HexColor::BLACK);
    }

    #[test]
    fn test_hue_survives_desaturation() {
        let mut model = PickerModel::from_hex(HexColor::rgb(0, 0, 255));
        model.set_saturation_value(Vec2::new(0.0, 0.5));
        let grey = model.to_hex();
        assert!(!model.sync(grey));
        model.set_saturation_value(Vec2::new(1.0, 0.0));
        assert_eq!(model.to_hex(), HexColor::rgb(0, 0, 255));
    }

    #[test]
    fn test_sync_keeps_hue_for_external_greys() {
        let mut model = PickerModel::from_hex(HexColor::rgb(0, 255, 0));
        assert!(model.sync(HexColor::WHITE));
        assert!((model.hsva.hue - 120.0).abs() < 0.5);
        assert_eq!(model.to_hex(), HexColor::WHITE);
    }

    #[test]
    fn test_hue_strip_runs_through_primaries() {
        let texels = hue_texels(64);
        assert_eq!(texels.len(), 64 * 4);
        assert_eq!(&texels[0..4], &[255, 0, 0, 255]);
        // x = 21 of 63 is hue 120
        assert_eq!(&texels[21 * 4..22 * 4], &[0, 255, 0, 255]);
    }

    #[test]
    fn test_square_texels_top_right_is_pure_hue() {
        let size = 16;
        let texels = saturation_value_texels(240.0, size);
        let i = ((size - 1) * 4) as usize;
        assert_eq!(&texels[i..i + 4], &[0, 0, 255, 255]);
        assert_eq!(&texels[0..4], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_centered_to_unit() {
        assert_eq!(unit_from_centered(Vec2::new(-0.5, -0.5)), Vec2::ZERO);
        assert_eq!(unit_from_centered(Vec2::ZERO), Vec2::splat(0.5));
        assert_eq!(unit_from_centered(Vec2::new(2.0, 0.5)), Vec2::ONE);
    }

    #[test]
    fn test_markers() {
        let mut model = PickerModel::default();
        model.set_hue(0.25);
        model.set_saturation_value(Vec2::new(0.5, 0.25));
        assert!((model.hue_marker() - 25.0).abs() < 1e-4);
        assert!(model.saturation_value_marker().abs_diff_eq(Vec2::new(50.0, 25.0), 1e-4));
    }
}
