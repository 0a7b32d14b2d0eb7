use super::fade::{depth_band_opacity, distance_fade, near_fade, staggered_progress};
use super::{FrameContext, VisualDriver};
use crate::config::ContentConfig;
use crate::error::{Error, Result};
use crate::motion::timing::lerp;
use crate::scene::{ContentView, GlyphView, ItemView, SceneFrame, UpcomingView};
use crate::sequence::SectionView;

/// Depth between two consecutive text planes; the band thresholds assume it
const PLANE_SPACING: f64 = 1000.0;

/// Section text, its auxiliary items and the upcoming-title preview
#[derive(Debug, Clone)]
pub struct ContentLayer {
    config: ContentConfig,
}

impl ContentLayer {
    pub fn new(config: ContentConfig) -> Self {
        Self { config }
    }

    /// Intra-section progress as seen from the displayed section
    fn displayed_progress(view: &SectionView) -> f64 {
        use std::cmp::Ordering;
        match view.position.index.cmp(&view.displayed) {
            Ordering::Equal => view.position.progress,
            Ordering::Greater => 1.0,
            Ordering::Less => 0.0,
        }
    }

    fn glyphs(text: &str, offset: usize, ctx: &FrameContext<'_>) -> Vec<GlyphView> {
        let section = ctx.section;
        text.chars()
            .enumerate()
            .map(|(i, ch)| {
                let (opacity, rise) = match section.reveal() {
                    Some(reveal) => (
                        reveal.char_opacity(offset + i, ctx.now),
                        reveal.char_rise(offset + i, ctx.now),
                    ),
                    None if section.intro_started.is_some() => (1.0, 0.0),
                    None => (0.0, 1.0),
                };
                GlyphView { ch, opacity, rise }
            })
            .collect()
    }
}

impl VisualDriver for ContentLayer {
    fn update(&mut self, ctx: &FrameContext<'_>, scene: &mut SceneFrame) -> Result<()> {
        let view = ctx.section;
        let section = ctx.sequence.get(view.displayed).ok_or(Error::InvalidSection {
            index: view.displayed,
            count: ctx.sequence.len(),
        })?;

        let title_len = section.title.chars().count();
        let title = Self::glyphs(&section.title, 0, ctx);
        let subtitle = Self::glyphs(&section.subtitle, title_len, ctx);

        let progress = Self::displayed_progress(view);
        let items = section
            .items
            .iter()
            .map(|item| {
                let approach = staggered_progress(progress, item.delay);
                let distance = lerp(self.config.item_far, self.config.item_near, approach);
                let opacity = distance_fade(distance, self.config.item_fade_start, self.config.item_fade_end)
                    * near_fade(
                        distance,
                        self.config.item_near_fade_start,
                        self.config.item_near_fade_end,
                    )
                    * view.text_opacity;
                ItemView {
                    label: item.label.clone(),
                    opacity,
                    approach,
                }
            })
            .collect();

        let section_float = view.position.index as f64 + view.position.progress;
        let upcoming = ctx.sequence.get(view.displayed + 1).and_then(|next| {
            let effective_z = (section_float - (view.displayed + 1) as f64) * PLANE_SPACING;
            let opacity = depth_band_opacity(effective_z) * (1.0 - view.text_opacity * 0.5);
            (opacity > 0.0).then(|| UpcomingView {
                title: next.title.clone(),
                opacity,
            })
        });

        let pointer = ctx.pointer;
        scene.content = Some(ContentView {
            section: view.displayed,
            title,
            subtitle,
            opacity: view.text_opacity,
            offset_x: pointer.smoothed_x * self.config.parallax_x,
            offset_y: pointer.smoothed_y * self.config.parallax_y,
            tilt_deg: -pointer.smoothed_x * self.config.steer_deg * 0.5,
            items,
            upcoming,
            is_final: view.is_last(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::PointerState;
    use crate::testing::FrameFixture;
    use std::time::Duration;

    #[test]
    fn test_text_hidden_before_intro() {
        let mut fixture = FrameFixture::new();
        fixture.intro = false;
        let mut layer = ContentLayer::new(ContentConfig::default());
        let scene = fixture.run(&mut layer, 0.0, Duration::ZERO);
        let content = scene.content.unwrap();
        assert_eq!(content.opacity, 0.0);
        assert!(content.title.iter().all(|g| g.opacity == 0.0));
        assert_eq!(content.title.iter().map(|g| g.ch).collect::<String>(), "LIFTOFF");
    }

    #[test]
    fn test_parallax_offsets() {
        let mut fixture = FrameFixture::new();
        fixture.pointer = PointerState {
            smoothed_x: 0.5,
            smoothed_y: -1.0,
            ..Default::default()
        };
        let mut layer = ContentLayer::new(ContentConfig::default());
        let content = fixture.run(&mut layer, 0.0, Duration::ZERO).content.unwrap();
        assert_eq!(content.offset_x, 20.0);
        assert_eq!(content.offset_y, -35.0);
        assert_eq!(content.tilt_deg, -2.0);
    }

    #[test]
    fn test_items_stagger_with_section_progress() {
        let mut fixture = FrameFixture::new();
        let mut layer = ContentLayer::new(ContentConfig::default());

        // section 2 (THE CREW) starts at progress 0.5
        let start = fixture.run(&mut layer, 0.5, Duration::ZERO).content.unwrap();
        assert_eq!(start.section, 2);
        assert_eq!(start.items.len(), 5);
        assert!(start.items.iter().all(|i| i.opacity == 0.0 && i.approach == 0.0));

        // near the end of the section every item has arrived
        let end = fixture.run(&mut layer, 0.7499, Duration::ZERO).content.unwrap();
        assert!(end.items.iter().all(|i| i.approach > 0.99 && i.opacity > 0.99));

        // halfway through, earlier items lead later ones
        let mid = fixture.run(&mut layer, 0.625, Duration::ZERO).content.unwrap();
        assert!(mid.items[0].approach > mid.items[4].approach);
    }

    #[test]
    fn test_upcoming_title_fades_in_on_approach() {
        let mut fixture = FrameFixture::new();
        let mut layer = ContentLayer::new(ContentConfig::default());
        let early = fixture.run(&mut layer, 0.0, Duration::ZERO).content.unwrap();
        assert!(early.upcoming.is_none());
        let late = fixture.run(&mut layer, 0.24, Duration::ZERO).content.unwrap();
        let upcoming = late.upcoming.unwrap();
        assert_eq!(upcoming.title, "THE MISSION");
        assert!(upcoming.opacity > 0.0);
    }

    #[test]
    fn test_final_section_variant() {
        let mut fixture = FrameFixture::new();
        let mut layer = ContentLayer::new(ContentConfig::default());
        let content = fixture.run(&mut layer, 1.0, Duration::ZERO).content.unwrap();
        assert!(content.is_final);
        assert!(content.upcoming.is_none());
    }
}
