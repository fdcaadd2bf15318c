use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

pub fn create_volume_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let pb = multi_progress.add(ProgressBar::new(100));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{prefix:.bold} [{bar:40.cyan}] {pos:>3}%")
            .unwrap()
            .progress_chars("█▊ "),
    );
    pb.set_prefix("Volume");
    pb
}

pub fn create_status_spinner(multi_progress: &MultiProgress) -> ProgressBar {
    let pb = multi_progress.add(ProgressBar::new_spinner());
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.dim} {spinner} {wide_msg}")
            .unwrap(),
    );
    pb.set_prefix("Remote");
    pb
}
