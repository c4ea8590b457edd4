use std::path::PathBuf;

use anyhow::{Result, bail};
use gyre_engine::render::SceneKind;

pub const USAGE: &str = "usage: gyre-demo [triangle|cube|textured] [image-path]";

/// Command line: `[scene] [image-path]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DemoArgs {
    pub scene: SceneKind,
    /// Replaces the bundled texture for the textured scene.
    pub image: Option<PathBuf>,
}

impl DemoArgs {
    /// Parses arguments, program name excluded.
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut args = args.into_iter();

        let scene = match args.next() {
            Some(name) => parse_scene(&name)?,
            None => SceneKind::default(),
        };
        let image = args.next().map(PathBuf::from);

        if let Some(extra) = args.next() {
            bail!("unexpected argument `{extra}`\n{USAGE}");
        }
        if image.is_some() && !scene.uses_texture() {
            log::warn!("{} scene ignores the image argument", scene.label());
        }

        Ok(Self { scene, image })
    }
}

fn parse_scene(name: &str) -> Result<SceneKind> {
    match name.to_ascii_lowercase().as_str() {
        "triangle" => Ok(SceneKind::Triangle),
        "cube" => Ok(SceneKind::Cube),
        "textured" | "textured-cube" => Ok(SceneKind::TexturedCube),
        _ => bail!("unknown scene `{name}`\n{USAGE}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<DemoArgs> {
        DemoArgs::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults_to_textured_cube() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.scene, SceneKind::TexturedCube);
        assert_eq!(args.image, None);
    }

    #[test]
    fn scene_names() {
        assert_eq!(parse(&["triangle"]).unwrap().scene, SceneKind::Triangle);
        assert_eq!(parse(&["Cube"]).unwrap().scene, SceneKind::Cube);
        assert_eq!(parse(&["textured"]).unwrap().scene, SceneKind::TexturedCube);
    }

    #[test]
    fn image_path_is_second() {
        let args = parse(&["textured", "crate.png"]).unwrap();
        assert_eq!(args.image, Some(PathBuf::from("crate.png")));
    }

    #[test]
    fn rejects_unknown_scene_and_extra_args() {
        assert!(parse(&["sphere"]).is_err());
        assert!(parse(&["cube", "a.png", "b.png"]).is_err());
    }
}
