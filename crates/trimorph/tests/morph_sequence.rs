use std::{fs::File, io::BufReader, path::Path};

use image::{codecs::gif::GifDecoder, AnimationDecoder};
use trimorph::{
    config::MorphConfig,
    image::{Image, ImageSize},
    imgproc::{
        morph::{morph, FrameSchedule, Morpher},
        parallel::ExecutionStrategy,
        warp::{HullPolicy, WarpOptions},
        MorphError,
    },
    io::{functional::read_image_rgb8, functional::write_image_png_rgb8, IoError},
    pipeline::{frame_file_name, run, PipelineError},
};

fn gradient(size: ImageSize, seed: usize) -> Image<u8, 3> {
    let data = (0..size.num_pixels() * 3)
        .map(|i| ((i * 7 + seed * 13) % 256) as u8)
        .collect();
    Image::new(size, data).expect("valid gradient image")
}

#[test]
fn red_to_blue_halfway() -> Result<(), MorphError> {
    let size = ImageSize {
        width: 4,
        height: 4,
    };
    let red = Image::<u8, 3>::from_size_pixel(size, [255, 0, 0])?;
    let blue = Image::<u8, 3>::from_size_pixel(size, [0, 0, 255])?;
    let pts = vec![[0.0, 0.0], [3.0, 0.0], [0.0, 3.0], [3.0, 3.0]];

    let frames = morph(&red, &blue, &pts, &pts, &[0.5], &[0.5])?;
    assert_eq!(frames.len(), 1);
    for pixel in frames[0].as_slice().chunks_exact(3) {
        assert_eq!(pixel, [127, 0, 127]);
    }
    Ok(())
}

#[test]
fn sequence_shape_and_boundaries() -> Result<(), MorphError> {
    let size = ImageSize {
        width: 24,
        height: 16,
    };
    let source = gradient(size, 1);
    let target = gradient(size, 5);
    let src_pts = vec![[4.0, 3.0], [19.0, 4.0], [12.0, 8.0], [5.0, 12.0], [18.0, 13.0]];
    let dst_pts = vec![[3.0, 4.0], [20.0, 3.0], [11.0, 9.0], [6.0, 11.0], [19.0, 12.0]];

    let schedule = FrameSchedule::linear(6);
    let frames = morph(
        &source,
        &target,
        &src_pts,
        &dst_pts,
        schedule.warp_fractions(),
        schedule.dissolve_fractions(),
    )?;
    assert_eq!(frames.len(), 6);
    assert!(frames.iter().all(|f| f.size() == size));
    assert_eq!(frames[0], source);

    let last = morph(&source, &target, &src_pts, &dst_pts, &[1.0], &[1.0])?;
    assert_eq!(last[0], target);
    Ok(())
}

#[test]
fn strategies_and_policies_agree_inside_the_mesh() -> Result<(), MorphError> {
    let size = ImageSize {
        width: 20,
        height: 20,
    };
    let source = gradient(size, 2);
    let target = gradient(size, 9);
    let src_pts = vec![[0.0, 0.0], [19.0, 0.0], [0.0, 19.0], [19.0, 19.0], [9.0, 10.0]];
    let dst_pts = vec![[0.0, 0.0], [19.0, 0.0], [0.0, 19.0], [19.0, 19.0], [11.0, 8.0]];

    let mut rendered = Vec::new();
    for (strategy, hull_policy) in [
        (ExecutionStrategy::Serial, HullPolicy::ExtendToCorners),
        (ExecutionStrategy::ParallelRows, HullPolicy::ExtendToCorners),
        (ExecutionStrategy::ParallelRows, HullPolicy::NearestTriangle),
    ] {
        let options = WarpOptions {
            strategy,
            hull_policy,
            ..Default::default()
        };
        let morpher = Morpher::new(&source, &target, &src_pts, &dst_pts, options)?;
        rendered.push(morpher.frame(0.3, 0.6)?);
    }

    // the landmarks span the whole canvas, so the hull policy never kicks in
    assert_eq!(rendered[0], rendered[1]);
    assert_eq!(rendered[1], rendered[2]);
    Ok(())
}

#[test]
fn invalid_inputs_are_rejected() -> Result<(), MorphError> {
    let img = Image::<u8, 3>::from_size_val([8, 8].into(), 0)?;
    let small = Image::<u8, 3>::from_size_val([8, 7].into(), 0)?;
    let pts = vec![[1.0, 1.0], [6.0, 1.0], [1.0, 6.0], [6.0, 6.0]];

    assert_eq!(
        morph(&img, &small, &pts, &pts, &[0.5], &[0.5]),
        Err(MorphError::ImageSizeMismatch(img.size(), small.size()))
    );
    assert_eq!(
        morph(&img, &img, &pts[..3], &pts[..3], &[0.5], &[0.5]),
        Err(MorphError::NotEnoughLandmarks(3))
    );
    let mut bad = pts.clone();
    bad[2] = [f64::INFINITY, 1.0];
    assert_eq!(
        morph(&img, &img, &pts, &bad, &[0.5], &[0.5]),
        Err(MorphError::NonFiniteLandmark(2))
    );
    assert_eq!(
        morph(&img, &img, &pts, &pts, &[0.5, 0.5], &[0.5, 1.5]),
        Err(MorphError::InvalidFraction(1.5))
    );
    Ok(())
}

fn write_config(dir: &Path, extra: &str) -> std::io::Result<std::path::PathBuf> {
    let path = dir.join("morph.json");
    let json = format!(
        r#"{{
            "source_image": "a.png",
            "target_image": "b.png",
            "source_landmarks": [[2, 2], [13, 2], [2, 9], [13, 9], [7, 5]],
            "target_landmarks": [[3, 2], [12, 3], [2, 8], [13, 9], [8, 6]],
            "num_frames": 5,
            "output": "out/morph.gif",
            "frames_dir": "frames"{extra}
        }}"#
    );
    std::fs::write(&path, json)?;
    Ok(path)
}

#[test]
fn pipeline_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let size = ImageSize {
        width: 16,
        height: 12,
    };
    let source = gradient(size, 3);
    write_image_png_rgb8(tmp_dir.path().join("a.png"), &source)?;
    write_image_png_rgb8(tmp_dir.path().join("b.png"), &gradient(size, 8))?;

    let config_path = write_config(tmp_dir.path(), r#", "frame_delay_ms": 80"#)?;
    let config = MorphConfig::from_file(&config_path)?;
    let summary = run(&config)?;

    assert_eq!(summary.num_frames, 5);
    assert_eq!(summary.image_size, size);
    assert_eq!(summary.output, tmp_dir.path().join("out").join("morph.gif"));

    let decoder = GifDecoder::new(BufReader::new(File::open(&summary.output)?))?;
    let gif_frames = decoder.into_frames().collect_frames()?;
    assert_eq!(gif_frames.len(), 5);
    for frame in &gif_frames {
        assert_eq!(frame.buffer().dimensions(), (16, 12));
        let (numer, denom) = frame.delay().numer_denom_ms();
        assert_eq!(numer / denom, 80);
    }

    let frames_dir = tmp_dir.path().join("frames");
    assert_eq!(std::fs::read_dir(&frames_dir)?.count(), 5);
    let first = read_image_rgb8(frames_dir.join(frame_file_name(0)))?;
    assert_eq!(first, source);
    Ok(())
}

#[test]
fn pipeline_missing_image() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    write_image_png_rgb8(
        tmp_dir.path().join("a.png"),
        &gradient([8, 8].into(), 0),
    )?;
    let config = MorphConfig::from_file(write_config(tmp_dir.path(), "")?)?;

    assert!(matches!(
        run(&config),
        Err(PipelineError::Io(IoError::FileDoesNotExist(path))) if path.ends_with("b.png")
    ));
    assert!(!tmp_dir.path().join("out").exists());
    Ok(())
}
