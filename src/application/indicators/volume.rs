use crate::domain::signal::VolumeTrend;
use statrs::statistics::{Data, Distribution};

/// Compares mean volume of the first half of the window against the second half.
pub fn volume_trend(volumes: &[f64], threshold: f64) -> VolumeTrend {
    if volumes.len() < 2 {
        return VolumeTrend::Stable;
    }

    let (first, second) = volumes.split_at(volumes.len() / 2);
    let first_mean = Data::new(first.to_vec()).mean().unwrap_or(0.0);
    let second_mean = Data::new(second.to_vec()).mean().unwrap_or(0.0);

    if first_mean <= 0.0 {
        return VolumeTrend::Stable;
    }

    let change = (second_mean - first_mean) / first_mean;
    if change > threshold {
        VolumeTrend::Rising
    } else if change < -threshold {
        VolumeTrend::Falling
    } else {
        VolumeTrend::Stable
    }
}
