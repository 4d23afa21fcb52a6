//! Channel downmix to the mono analysis stream

/// Average the input channels into `out`
///
/// * no channels: silence
/// * one channel: copied unchanged
/// * two or more: mean of the first two (extra channels are not analyzed)
///
/// Only `out.len()` samples are produced; shorter channels are read as silent
/// past their end.
pub fn downmix_into<C: AsRef<[f32]>>(channels: &[C], out: &mut [f32]) {
    match channels {
        [] => out.fill(0.0),
        [mono] => copy_padded(mono.as_ref(), out),
        [left, right, ..] => {
            let (left, right) = (left.as_ref(), right.as_ref());
            for (i, dst) in out.iter_mut().enumerate() {
                let l = left.get(i).copied().unwrap_or(0.0);
                let r = right.get(i).copied().unwrap_or(0.0);
                *dst = 0.5 * (l + r);
            }
        }
    }
}

fn copy_padded(src: &[f32], out: &mut [f32]) {
    let n = src.len().min(out.len());
    out[..n].copy_from_slice(&src[..n]);
    out[n..].fill(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stereo_average() {
        let left = [1.0, 2.0, 3.0];
        let right = [3.0, 2.0, 1.0];
        let mut out = [0.0; 3];

        downmix_into(&[&left[..], &right[..]], &mut out);
        assert_eq!(out, [2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_mono_identity() {
        let mono = [0.25, -0.5, 1.0];
        let mut out = [9.0; 3];

        downmix_into(&[&mono[..]], &mut out);
        assert_eq!(out, mono);
    }

    #[test]
    fn test_no_channels_is_silence() {
        let mut out = [1.0; 4];
        downmix_into::<&[f32]>(&[], &mut out);
        assert_eq!(out, [0.0; 4]);
    }

    #[test]
    fn test_short_channel_padded() {
        let mono = vec![1.0, 1.0];
        let mut out = [5.0; 4];
        downmix_into(&[mono], &mut out);
        assert_eq!(out, [1.0, 1.0, 0.0, 0.0]);
    }
}
