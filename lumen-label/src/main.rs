//! Lumen demo: headless rich-text label run.
//!
//! Lays out one piece of markup, reconciles its sprites, simulates a click
//! on every clickable region, and logs what came out.
//!
//! ```text
//! lumen-demo [--mono] [--config label.json] [markup]
//! ```
//!
//! `RUST_LOG=debug` shows the layout passes.

use std::error::Error;

use log::info;

use lumen_core::Vec2;
use lumen_label::{LabelConfig, RichLabel};
use lumen_text::{CosmicLayout, GlyphLayout, MonospaceLayout};

const DEMO_MARKUP: &str = "<material=shadow x=1 y=-1>Hello</material> \
<material=image sprite=smile+wink atlas=faces frame=4 w=20 h=20 event=emote args=1></material> \
<material=underline event=link args=docs>read more</material>";

struct Args {
    mono: bool,
    config: Option<String>,
    markup: Option<String>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        mono: false,
        config: None,
        markup: None,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--mono" => args.mono = true,
            "--config" => args.config = Some(it.next().ok_or("--config needs a path")?),
            _ if args.markup.is_none() => args.markup = Some(arg),
            _ => return Err(format!("unexpected argument {arg:?}")),
        }
    }
    Ok(args)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => LabelConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => LabelConfig::default(),
    };
    let engine: Box<dyn GlyphLayout> = if args.mono {
        Box::new(MonospaceLayout::new())
    } else {
        Box::new(CosmicLayout::new())
    };

    let mut label: RichLabel<_, String> = RichLabel::from_config(engine, &config)?;
    label.set_sprite_getter(|atlas, name| Some(format!("{}/{name}", atlas.unwrap_or("default"))));
    label.add_listener(|name, args| info!("clicked {name:?} args={args:?}"));
    label.set_click_fallback(|| info!("click missed every region"));
    label.set_on_relayout(|| info!("sprites reconciled"));
    label.set_text(args.markup.as_deref().unwrap_or(DEMO_MARKUP));

    let frame = label.populate_mesh();
    info!(
        "Lumen demo: {} quads, {} icons, {} events, {} effect tags",
        frame.vertices.len() / lumen_core::VERTS_PER_QUAD,
        frame.icons.len(),
        frame.events.len(),
        frame.tags.len()
    );
    info!("display text: {:?}", frame.text);

    // One second of animation at 60 fps.
    for _ in 0..60 {
        label.update(1.0 / 60.0);
    }
    for (i, sprite) in label.pool().active().enumerate() {
        info!(
            "sprite {i}: {:?} frame {} at ({:.1}, {:.1}) size {:.1}x{:.1}",
            sprite.sprite, sprite.frame, sprite.position.x, sprite.position.y, sprite.size.x, sprite.size.y
        );
    }

    let centres: Vec<Vec2> = label
        .registry()
        .rects()
        .iter()
        .map(|e| Vec2::new(e.rect.x + e.rect.width * 0.5, e.rect.y + e.rect.height * 0.5))
        .collect();
    for centre in centres {
        label.handle_click(centre);
    }
    label.handle_click(Vec2::new(f32::MAX, f32::MAX));

    let width = label.preferred_width();
    let height = label.preferred_height(config.size[0]);
    info!("preferred size: {width:.1} x {height:.1}");
    Ok(())
}
