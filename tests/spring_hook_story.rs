use coil::animation::frame_loop;
use coil::prelude::*;
use coil::runner::Frame;
use coil::stories::{self, spring_hook};

const FRAME: f32 = 1.0 / 60.0;

fn catalog() -> StoryCatalog {
    let mut catalog = StoryCatalog::new();
    stories::register_all(&mut catalog).unwrap();
    catalog
}

fn dash(frame: &Frame) -> StrokeDash {
    frame
        .scene
        .paths()
        .next()
        .and_then(|path| path.dash)
        .expect("star path has a dash")
}

#[test]
fn test_spring_hook_is_registered() {
    let catalog = catalog();
    assert_eq!(catalog.names().collect::<Vec<_>>(), [spring_hook::NAME]);
    assert_eq!(spring_hook::NAME, "Spring Hook");

    let mut again = catalog;
    assert!(matches!(
        stories::register_all(&mut again),
        Err(StoryError::DuplicateStory(_))
    ));
}

#[test]
fn test_first_paint_is_hidden() {
    let runner = StoryRunner::mount(&catalog(), "Spring Hook").unwrap();
    let first = runner.current_frame();
    assert_eq!(first.index, 0);
    assert!(!first.scene.visible);
    assert!(!first.scene.to_svg().contains("<path"));
}

#[test]
fn test_star_draws_in_and_settles() {
    let mut runner = StoryRunner::mount(&catalog(), "Spring Hook").unwrap();

    // The measured length becomes the dash, nothing drawn yet.
    let mounted = runner.frame(0.0);
    assert!(mounted.repainted);
    assert!(mounted.scene.visible);
    let length = dash(&mounted).array;
    assert!((length - 72.1556).abs() < 1e-3, "length {length}");
    assert_eq!(dash(&mounted).offset, length);

    let frames = runner.run_until_settled(FRAME, 600);
    assert!(runner.is_idle(), "spring did not settle in 600 frames");
    assert!(frames.len() > 60, "molasses settled in {} frames", frames.len());

    let mut previous = length;
    for frame in &frames {
        let dash = dash(frame);
        assert_eq!(dash.array, length);
        assert!(dash.offset <= previous, "offset grew at frame {}", frame.index);
        assert!(dash.offset >= 0.0);
        previous = dash.offset;
    }
    assert_eq!(previous, 0.0);
    assert_eq!(dash(frames.last().unwrap()).progress(), 1.0);
}

#[test]
fn test_first_timed_frame_shows_hidden_stroke() {
    let mut runner = StoryRunner::mount(&catalog(), "Spring Hook").unwrap();

    let mounted = runner.frame(FRAME);
    assert_eq!(mounted.index, 1);
    assert!(mounted.repainted);
    assert!(mounted.scene.visible);
    assert_eq!(dash(&mounted).offset, dash(&mounted).array);

    let moving = runner.frame(FRAME);
    assert!(dash(&moving).offset < dash(&moving).array);
}

#[test]
fn test_second_runner_on_thread_is_refused() {
    let catalog = catalog();
    let first = StoryRunner::mount(&catalog, "Spring Hook").unwrap();
    assert!(matches!(
        StoryRunner::mount(&catalog, "Spring Hook"),
        Err(StoryError::RunnerBusy(name)) if name == "Spring Hook"
    ));
    assert!(frame_loop::has_active_animations());

    drop(first);
    assert!(StoryRunner::mount(&catalog, "Spring Hook").is_ok());
}

#[test]
fn test_settled_story_stops_repainting() {
    let mut runner = StoryRunner::mount(&catalog(), "Spring Hook").unwrap();
    runner.run_until_settled(FRAME, 600);

    let idle = runner.frame(FRAME);
    assert!(!idle.repainted);
    assert_eq!(dash(&idle).offset, 0.0);
}

#[test]
fn test_unmount_cancels_spring() {
    let mut runner = StoryRunner::mount(&catalog(), "Spring Hook").unwrap();
    runner.frame(FRAME);
    assert!(frame_loop::has_active_animations());

    runner.unmount();
    assert!(!frame_loop::has_active_animations());
    assert!(!frame_loop::tick(FRAME));
}

#[test]
fn test_remount_starts_over() {
    let catalog = catalog();
    let mut first = StoryRunner::mount(&catalog, "Spring Hook").unwrap();
    first.run_until_settled(FRAME, 30);
    drop(first);

    let mut second = StoryRunner::mount(&catalog, "Spring Hook").unwrap();
    let frame = second.frame(0.0);
    assert_eq!(dash(&frame).offset, dash(&frame).array);
}
