use ratatui::style::Color;

/// Colors of the space scene
#[derive(Debug, Clone)]
pub struct Theme {
    // Backdrop
    pub space: Color,
    pub star: Color,
    pub asteroid: Color,

    // Text layer
    pub title: Color,
    pub subtitle: Color,
    pub item: Color,
    pub upcoming: Color,

    // Indicator
    pub track: Color,
    pub marker_upcoming: Color,
    pub marker_active: Color,
    pub marker_passed: Color,
    pub rocket: Color,
    pub flame: Color,
    pub smoke: Color,
    pub debris: Color,

    // Chrome
    pub logo: Color,
    pub status_fg: Color,
    pub status_bg: Color,
    pub hint: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            space: Color::Rgb(0x05, 0x06, 0x0d),
            star: Color::Rgb(0xf2, 0xf4, 0xff),
            asteroid: Color::Rgb(0x9a, 0x8f, 0x84),
            title: Color::Rgb(0xff, 0xff, 0xff),
            subtitle: Color::Rgb(0xb8, 0xc4, 0xdc),
            item: Color::Rgb(0x8f, 0xd3, 0xff),
            upcoming: Color::Rgb(0x6c, 0x7a, 0x96),
            track: Color::Rgb(0x2e, 0x34, 0x48),
            marker_upcoming: Color::Rgb(0x55, 0x5f, 0x78),
            marker_active: Color::Rgb(0xff, 0xb3, 0x47),
            marker_passed: Color::Rgb(0x8f, 0xd3, 0xff),
            rocket: Color::Rgb(0xf2, 0xf4, 0xff),
            flame: Color::Rgb(0xff, 0x7a, 0x2e),
            smoke: Color::Rgb(0xa0, 0xa6, 0xb4),
            debris: Color::Rgb(0x6c, 0x7a, 0x96),
            logo: Color::Rgb(0xff, 0xff, 0xff),
            status_fg: Color::Rgb(0xd4, 0xbe, 0x98),
            status_bg: Color::Rgb(0x1a, 0x1d, 0x2b),
            hint: Color::Rgb(0x7c, 0x83, 0x96),
        }
    }
}

impl Theme {
    /// `color` at `opacity` over the space background
    pub fn fade(&self, color: Color, opacity: f64) -> Color {
        blend(self.space, color, opacity)
    }
}

/// Linear blend from `base` to `top`; non-RGB colors switch at half opacity
pub fn blend(base: Color, top: Color, opacity: f64) -> Color {
    let t = opacity.clamp(0.0, 1.0);
    match (base, top) {
        (Color::Rgb(br, bg, bb), Color::Rgb(tr, tg, tb)) => {
            let mix = |from: u8, to: u8| (from as f64 + (to as f64 - from as f64) * t).round() as u8;
            Color::Rgb(mix(br, tr), mix(bg, tg), mix(bb, tb))
        }
        _ if t >= 0.5 => top,
        _ => base,
    }
}

/// Texture pixel to a terminal color, premultiplied by `opacity`
pub fn rgba_over(base: Color, pixel: [u8; 4], opacity: f64) -> Color {
    let alpha = pixel[3] as f64 / 255.0 * opacity;
    blend(base, Color::Rgb(pixel[0], pixel[1], pixel[2]), alpha)
}
