use crate::LayoutError;
use crate::elements::KnuthElement;
use crate::interface::{ElementProducer, LayoutContext, LayoutEnvironment};
use crate::nodes::BlockElements;
use crate::position::{GraphicInfo, Position};
use folio_fo::ExternalGraphic;
use folio_style::Keep;
use folio_types::{Length, Size};
use std::sync::Arc;

/// Scales the intrinsic size to the requested content size. A single given
/// dimension keeps the aspect ratio.
fn scaled_size(intrinsic: Size, width: Option<Length>, height: Option<Length>) -> Size {
    let scale = |value: Length, num: Length, den: Length| -> Length {
        if den == 0 {
            0
        } else {
            ((value as i64 * num as i64) / den as i64) as Length
        }
    };
    match (width, height) {
        (Some(w), Some(h)) => Size::new(w, h),
        (Some(w), None) => Size::new(w, scale(intrinsic.height, w, intrinsic.width)),
        (None, Some(h)) => Size::new(scale(intrinsic.width, h, intrinsic.height), h),
        (None, None) => intrinsic,
    }
}

impl ElementProducer for ExternalGraphic {
    fn produce_elements(
        &self,
        _ctx: &LayoutContext,
        env: &LayoutEnvironment,
    ) -> Result<BlockElements, LayoutError> {
        let (intrinsic, placeholder) = match env.images.intrinsic_size(&self.src) {
            Ok(size) => (size, false),
            Err(e) => {
                log::warn!(
                    "{}: using placeholder for '{}': {}",
                    env.images.name(),
                    self.src,
                    e
                );
                (env.config.placeholder_image_size, true)
            }
        };
        let size = scaled_size(intrinsic, self.content_width, self.content_height);
        let info = GraphicInfo {
            id: self.id.clone(),
            src: self.src.clone(),
            width: size.width,
            height: size.height,
            placeholder,
        };
        let el = KnuthElement::new_box(size.height, Position::Graphic(Arc::new(info)));
        Ok(BlockElements {
            elements: vec![el],
            space_before: self.space_before,
            space_after: self.space_after,
            keep_with_previous: Keep::from(self.keep_with_previous),
            keep_with_next: Keep::from(self.keep_with_next),
            ..BlockElements::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_traits::InMemoryImageLoader;
    use folio_types::ResourceUri;

    fn graphic(src: &str) -> ExternalGraphic {
        ExternalGraphic {
            id: None,
            src: ResourceUri::from(src),
            content_width: None,
            content_height: None,
            space_before: Default::default(),
            space_after: Default::default(),
            keep_with_next: Default::default(),
            keep_with_previous: Default::default(),
        }
    }

    #[test]
    fn test_known_image_is_scaled_proportionally() {
        let loader = InMemoryImageLoader::new();
        loader.add("logo.png", Size::new(200_000, 100_000)).unwrap();
        let env = LayoutEnvironment {
            images: Arc::new(loader),
            ..LayoutEnvironment::default()
        };
        let mut g = graphic("logo.png");
        g.content_width = Some(100_000);
        let out = g.produce_elements(&LayoutContext::new(500_000), &env).unwrap();
        assert_eq!(out.elements[0].width(), 50_000);
        let Position::Graphic(info) = out.elements[0].position() else {
            panic!("expected graphic position");
        };
        assert!(!info.placeholder);
        assert_eq!(info.width, 100_000);
    }

    #[test]
    fn test_missing_image_uses_placeholder() {
        let env = LayoutEnvironment::default();
        let out = graphic("missing.png")
            .produce_elements(&LayoutContext::new(500_000), &env)
            .unwrap();
        assert_eq!(out.elements[0].width(), 72_000);
        let Position::Graphic(info) = out.elements[0].position() else {
            panic!("expected graphic position");
        };
        assert!(info.placeholder);
    }
}
