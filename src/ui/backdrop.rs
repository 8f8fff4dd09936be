//! Animated gradient behind the video screen

/// Convert HSL (degrees, percent, percent) to RGBA
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 4] {
    let h = h.rem_euclid(360.0) / 360.0;
    let s = (s / 100.0).clamp(0.0, 1.0);
    let l = (l / 100.0).clamp(0.0, 1.0);

    if s == 0.0 {
        return [l, l, l, 1.0];
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    [
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
        1.0,
    ]
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Colors and filters for one frame of the screen background
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backdrop {
    /// Hue/saturation/lightness of each gradient stop, top-left to bottom-right
    pub stops: [(f32, f32, f32); 4],
    pub brightness: f32,
    pub overlay_opacity: f32,
}

impl Backdrop {
    /// `progress` in 0..=1, `elapsed` in simulated seconds
    pub fn compute(progress: f32, elapsed: u32, playing: bool) -> Self {
        if !playing {
            return Self {
                stops: [(240.0, 35.0, 15.0), (260.0, 40.0, 10.0), (260.0, 40.0, 10.0), (220.0, 45.0, 18.0)],
                brightness: 0.9,
                overlay_opacity: 0.3,
            };
        }

        let t = elapsed as f32;
        let h1 = (240.0 + progress * 60.0) % 360.0;
        let h2 = (280.0 + progress * 40.0) % 360.0;
        let h3 = (200.0 + progress * 80.0) % 360.0;

        Self {
            stops: [(h1, 45.0, 18.0), (h2, 55.0, 12.0), (h3, 50.0, 20.0), (h1, 40.0, 15.0)],
            brightness: (t * 0.8).sin() * 0.03 + 0.97,
            overlay_opacity: (t * 0.4).sin() * 0.2 + 0.6,
        }
    }

    /// Corner colors in `add_rect_filled_multicolor` order:
    /// upper-left, upper-right, bottom-right, bottom-left
    pub fn corners(&self) -> [[f32; 4]; 4] {
        let color = |(h, s, l): (f32, f32, f32)| {
            let [r, g, b, a] = hsl_to_rgb(h, s, l);
            [
                (r * self.brightness).min(1.0),
                (g * self.brightness).min(1.0),
                (b * self.brightness).min(1.0),
                a,
            ]
        };
        [
            color(self.stops[0]),
            color(self.stops[1]),
            color(self.stops[3]),
            color(self.stops[2]),
        ]
    }
}
