use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    render::{layer_style, resolve_rect, visible, DrawRect, LayerStyle},
    timeline::build_timeline,
    AppConfig, BeatSchedule, ImagePool, Result, Timeline,
};

/// Distance between the title baseline box and the bottom edge, in pixels.
const TITLE_BOTTOM_OFFSET: f64 = 100.0;
/// Paint order of the title, above any beat group.
const TITLE_Z_ORDER: usize = 1000;

/// Inputs supplied by the upload layer for one video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositionProps {
    pub title: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub music: Option<String>,
}

impl CompositionProps {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// One image layer ready for the compositor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    pub image: String,
    pub group_index: usize,
    pub z_order: usize,
    pub rect: DrawRect,
    pub style: LayerStyle,
}

/// Static caption drawn on every frame, centred horizontally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleOverlay {
    pub text: String,
    pub center_x: f64,
    pub bottom: f64,
    pub z_order: usize,
}

/// Everything the compositor needs to paint one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameScene {
    pub frame: u64,
    pub width: u32,
    pub height: u32,
    /// Back to front.
    pub layers: Vec<Layer>,
    pub title: Option<TitleOverlay>,
}

/// A beat schedule, image pool and output format bound to a built timeline.
#[derive(Debug, Clone)]
pub struct Composition {
    config: AppConfig,
    schedule: BeatSchedule,
    pool: ImagePool,
    title: String,
    music: Option<String>,
    timeline: Timeline,
}

impl Composition {
    pub fn new(config: AppConfig, schedule: BeatSchedule, props: CompositionProps) -> Result<Self> {
        config.validate()?;
        let pool = ImagePool::new(props.images);
        let timeline = build_timeline(&schedule, &pool, config.video.fps, &config.layout)?;
        Ok(Self {
            config,
            schedule,
            pool,
            title: props.title,
            music: props.music,
            timeline,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn schedule(&self) -> &BeatSchedule {
        &self.schedule
    }

    pub fn pool(&self) -> &ImagePool {
        &self.pool
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Soundtrack attached to the whole video.
    pub fn audio(&self) -> Option<&str> {
        self.music.as_deref()
    }

    pub fn duration_frames(&self) -> u64 {
        self.config.video.duration_frames
    }

    pub fn frame(&self, frame: u64) -> FrameScene {
        let video = &self.config.video;
        let layers = visible(&self.timeline, frame)
            .into_iter()
            .filter_map(|item| {
                let image = self.pool.get_cyclic(item.image_index)?;
                Some(Layer {
                    image: image.to_string(),
                    group_index: item.group_index,
                    z_order: item.z_order,
                    rect: resolve_rect(item, video.width, video.height),
                    style: layer_style(item),
                })
            })
            .collect();

        let title = (!self.title.is_empty()).then(|| TitleOverlay {
            text: self.title.clone(),
            center_x: f64::from(video.width) / 2.0,
            bottom: TITLE_BOTTOM_OFFSET,
            z_order: TITLE_Z_ORDER,
        });

        FrameScene {
            frame,
            width: video.width,
            height: video.height,
            layers,
            title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CollageError;

    fn props(images: &[&str]) -> CompositionProps {
        CompositionProps {
            title: "Trip".to_string(),
            images: images.iter().map(|s| s.to_string()).collect(),
            music: Some("song.mp3".to_string()),
        }
    }

    #[test]
    fn frames_grow_layers_and_keep_title() {
        let comp = Composition::new(
            AppConfig::default(),
            BeatSchedule::demo(),
            props(&["a.jpg", "b.jpg", "c.jpg"]),
        )
        .unwrap();

        let empty = comp.frame(0);
        assert!(empty.layers.is_empty());
        let title = empty.title.expect("title overlay");
        assert_eq!(title.center_x, 540.0);
        assert_eq!(title.z_order, 1000);

        let later = comp.frame(100);
        assert_eq!(later.layers[0].image, "a.jpg");
        assert!(later
            .layers
            .windows(2)
            .all(|pair| pair[0].z_order <= pair[1].z_order));
        assert_eq!(comp.audio(), Some("song.mp3"));
    }

    #[test]
    fn empty_title_has_no_overlay() {
        let mut props = props(&["a.jpg"]);
        props.title.clear();
        let comp = Composition::new(AppConfig::default(), BeatSchedule::demo(), props).unwrap();
        assert!(comp.frame(50).title.is_none());
    }

    #[test]
    fn no_images_means_no_layers() {
        let comp = Composition::new(AppConfig::default(), BeatSchedule::demo(), props(&[])).unwrap();
        assert!(comp.timeline().is_empty());
        assert!(comp.frame(599).layers.is_empty());
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let mut config = AppConfig::default();
        config.video.fps = 0;
        let err = Composition::new(config, BeatSchedule::demo(), props(&["a.jpg"])).unwrap_err();
        assert!(matches!(err, CollageError::InvalidConfig(_)));
    }

    #[test]
    fn props_parse_with_optional_fields() {
        let props = CompositionProps::from_json_str(r#"{ "title": "Seoul" }"#).unwrap();
        assert!(props.images.is_empty());
        assert!(props.music.is_none());
    }
}
