use std::fs;
use std::path::Path;

use burn::backend::NdArray;
use image::{GrayImage, Luma, Rgb, RgbImage};
use robustmis_loader::application::iterate_use_case::IterateUseCase;
use robustmis_loader::{DatasetConfig, LoaderConfig, RobustLoader, RunConfig, Split, TargetShape};

type TestBackend = NdArray<f32>;

/// Five images under `robustmislite/`, labels for the first three,
/// weak labels for all five, and a `3_train_supervised.txt` index.
fn write_dataset(root: &Path) -> RunConfig {
    let ds = root.join("robustmislite");
    fs::create_dir_all(ds.join("images")).unwrap();
    fs::create_dir_all(ds.join("labels")).unwrap();
    let weak = root.join("weak");
    fs::create_dir_all(&weak).unwrap();

    let mut index = String::new();
    for i in 0..5u8 {
        let name = format!("frame_{i}");
        RgbImage::from_pixel(6, 4, Rgb([i * 10, 0, 255]))
            .save(ds.join(format!("images/{name}.png")))
            .unwrap();
        if i < 3 {
            GrayImage::from_pixel(6, 4, Luma([1]))
                .save(ds.join(format!("labels/{name}.png")))
                .unwrap();
        }
        GrayImage::from_pixel(6, 4, Luma([0]))
            .save(weak.join(format!("{name}.png")))
            .unwrap();
        index.push_str(&format!("/images/{name}.png /labels/{name}.png\n"));
    }

    let splits = root.join("splits");
    fs::create_dir_all(&splits).unwrap();
    fs::write(splits.join("3_train_supervised.txt"), index).unwrap();

    RunConfig {
        dataset: DatasetConfig {
            data_dir: root.to_path_buf(),
            split: Split::TrainSupervised,
            n_labeled_examples: 3,
            split_dir: splits,
            weak_labels_output: Some(weak),
            target: TargetShape::new(4, 6),
            ..DatasetConfig::default()
        },
        loader: LoaderConfig::with_batch_size(2),
    }
}

fn train_ids(cfg: RunConfig) -> Vec<String> {
    let loaders = RobustLoader::new(cfg)
        .unwrap()
        .build::<TestBackend>(&Default::default())
        .unwrap();
    loaders.train.iter().flat_map(|b| b.image_ids).collect()
}

fn all_ids() -> Vec<String> {
    (0..5).map(|i| format!("frame_{i}")).collect()
}

#[test]
fn batches_cover_the_split_in_order() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = write_dataset(tmp.path());
    assert_eq!(cfg.loader.num_workers, 0);

    let loaders = RobustLoader::new(cfg)
        .unwrap()
        .build::<TestBackend>(&Default::default())
        .unwrap();
    assert!(loaders.val.is_none());
    assert_eq!(loaders.train_len, 5);

    let batches: Vec<_> = loaders.train.iter().collect();
    assert_eq!(batches.len(), 3);
    assert_eq!(batches[0].images.dims(), [2, 3, 4, 6]);
    assert_eq!(batches[0].labels.dims(), [2, 4, 6]);
    assert_eq!(batches[2].images.dims(), [1, 3, 4, 6]);

    let ids: Vec<String> = batches.iter().flat_map(|b| b.image_ids.clone()).collect();
    assert_eq!(ids, ["frame_0", "frame_1", "frame_2", "frame_3", "frame_4"]);

    // frame_0..2 have ground truth ones, frame_3..4 fall back to zeros
    let first: Vec<i64> = batches[0].labels.clone().into_data().iter::<i64>().collect();
    assert!(first.iter().all(|&v| v == 1));
    let last: Vec<i64> = batches[2].labels.clone().into_data().iter::<i64>().collect();
    assert!(last.iter().all(|&v| v == 0));

    // Blue channel is 255 everywhere: (1.0 - 0.406) / 0.225
    let images: Vec<f32> = batches[0].images.clone().into_data().to_vec::<f32>().unwrap();
    let plane = 4 * 6;
    let expected = (1.0 - 0.406) / 0.225;
    assert!((images[2 * plane] - expected).abs() < 1e-4);
}

#[test]
fn weak_labels_replace_ground_truth() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cfg = write_dataset(tmp.path());
    cfg.dataset.use_weak_labels = true;

    let loaders = RobustLoader::new(cfg)
        .unwrap()
        .build::<TestBackend>(&Default::default())
        .unwrap();
    for batch in loaders.train.iter() {
        let labels: Vec<i64> = batch.labels.into_data().iter::<i64>().collect();
        assert!(labels.iter().all(|&v| v == 0));
    }
}

#[test]
fn val_split_and_metrics_csv() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cfg = write_dataset(tmp.path());
    cfg.loader.val_split = Some(0.4);
    let csv = tmp.path().join("out/batches.csv");

    let report = IterateUseCase::new(cfg)
        .with_metrics(&csv)
        .run_on::<TestBackend>(&Default::default())
        .unwrap();

    assert_eq!(report.train_samples, 3);
    assert_eq!(report.val_samples, 2);
    assert_eq!(report.train_batches, 2);
    assert_eq!(report.val_batches, 1);

    let text = fs::read_to_string(&csv).unwrap();
    assert_eq!(text.lines().count(), 1 + report.train_batches);
}

#[test]
fn missing_index_file_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cfg = write_dataset(tmp.path());
    cfg.dataset.split = Split::Val;

    let err = RobustLoader::new(cfg)
        .unwrap()
        .build::<TestBackend>(&Default::default())
        .err()
        .expect("val.txt does not exist");
    assert!(format!("{err:#}").contains("val.txt"));
}

#[test]
fn worker_threads_load_every_sample() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cfg = write_dataset(tmp.path());
    cfg.loader.num_workers = 2;

    let mut ids = train_ids(cfg);
    ids.sort();
    assert_eq!(ids, all_ids());
}

#[test]
fn seeded_shuffle_is_repeatable() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cfg = write_dataset(tmp.path());
    cfg.loader.shuffle = true;
    cfg.loader.seed = 7;

    let first = train_ids(cfg.clone());
    let second = train_ids(cfg);
    assert_eq!(first, second);

    let mut sorted = first;
    sorted.sort();
    assert_eq!(sorted, all_ids());
}

#[test]
fn missing_image_mid_split_fails_the_build() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = write_dataset(tmp.path());
    fs::remove_file(tmp.path().join("robustmislite/images/frame_2.png")).unwrap();

    let err = RobustLoader::new(cfg)
        .unwrap()
        .build::<TestBackend>(&Default::default())
        .err()
        .expect("frame_2.png is gone");
    let msg = format!("{err:#}");
    assert!(msg.contains("frame_2.png"), "{msg}");
    assert!(msg.contains("1 listed image(s)"), "{msg}");
}

#[test]
fn missing_batch_size_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cfg = write_dataset(tmp.path());
    cfg.loader.batch_size = None;
    assert!(RobustLoader::new(cfg).is_err());
}
