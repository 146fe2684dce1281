use rstest::rstest;
use rstest_reuse::{self, *};

use tracker_resample::{AnyResampler, BitDepth, Bits16, Quality, Resampler, Shape, VolumeRamp};

mod test_support;
use test_support::{drive, split, tolerance, to_output_scale, TestSignal, DEPTHS};

#[template]
#[rstest]
#[case(Quality::Aliasing)]
#[case(Quality::Linear)]
#[case(Quality::Cubic)]
#[case(Quality::Sinc)]
fn every_quality(#[case] quality: Quality) {}

#[template]
#[rstest]
#[case(Shape::OneToOne)]
#[case(Shape::OneToTwo)]
#[case(Shape::TwoToOne)]
#[case(Shape::TwoToTwo)]
fn every_shape(#[case] shape: Shape) {}

fn unity() -> [VolumeRamp; 2] {
    [VolumeRamp::unity(), VolumeRamp::unity()]
}

#[apply(every_quality)]
#[trace]
fn constant_signal_comes_out_unchanged(quality: Quality) {
    for depth in DEPTHS {
        let peak = test_support::full_scale(depth);
        for value in [peak * 9 / 10, -peak / 3] {
            let source = move |_: usize, _: i64| value;
            for shape in Shape::ALL {
                for delta in [0.3, 1.0, 1.7, 3.25] {
                    let mut resampler =
                        AnyResampler::start(depth, &source, 2, 100, 0, 1000, Some(quality))
                            .unwrap();
                    let (output, frames) = drive(&mut resampler, shape, &[64], &mut unity(), delta);
                    assert_eq!(frames, 64);

                    let mut expected = to_output_scale(depth, value);
                    if shape == Shape::TwoToOne {
                        // both channels at unity add up
                        expected *= 2;
                    }
                    let tolerance = tolerance(quality, expected);
                    for (i, sample) in output.iter().enumerate() {
                        assert!(
                            (sample - expected).abs() <= tolerance,
                            "{depth:?} {shape:?} delta {delta}: sample {i} is {sample}, expected {expected}"
                        );
                    }
                }
            }
        }
    }
}

#[apply(every_quality)]
#[trace]
fn splitting_a_call_changes_nothing(quality: Quality) {
    for depth in DEPTHS {
        let signal = TestSignal::noise(depth, 2, 400, 7);
        for shape in Shape::ALL {
            for (position, delta) in [(20, 0.37), (20, 1.0), (20, 2.6), (350, -0.8)] {
                let run = |chunks: &[usize]| {
                    let mut resampler =
                        AnyResampler::start(depth, &signal, 2, position, 0, 400, Some(quality))
                            .unwrap();
                    let mut ramps = [
                        VolumeRamp::fade(0.2, 0.9).with_delta(0.01),
                        VolumeRamp::new(0.7),
                    ];
                    let (output, frames) = drive(&mut resampler, shape, chunks, &mut ramps, delta);
                    (output, frames, ramps, resampler.window())
                };

                let whole = run(&[120]);
                assert_eq!(whole.1, 120);
                for sizes in [&[1, 36, 2][..], &[60], &[119]] {
                    let pieces = run(&split(120, sizes));
                    assert_eq!(
                        whole, pieces,
                        "{depth:?} {shape:?} delta {delta} split {sizes:?}"
                    );
                }
            }
        }
    }
}

#[apply(every_shape)]
#[trace]
fn short_windows_clamp_the_count(shape: Shape) {
    for quality in Quality::ALL {
        let signal = TestSignal::noise(BitDepth::Sixteen, 2, 16, 3);
        let mut resampler =
            AnyResampler::start(BitDepth::Sixteen, &signal, 2, 0, 0, 10, Some(quality)).unwrap();

        // 0.75 per frame reaches 9.75 on the 14th frame
        let (_, frames) = drive(&mut resampler, shape, &[32], &mut unity(), 0.75);
        assert_eq!(frames, 14, "{quality:?}");
        assert_eq!(resampler.window().position, 10);
        assert_eq!(resampler.window().subpos, 0);
        assert!(resampler.is_exhausted());

        let (_, frames) = drive(&mut resampler, shape, &[8], &mut unity(), 0.75);
        assert_eq!(frames, 0);
    }
}

#[apply(every_shape)]
#[trace]
fn requests_inside_the_window_are_filled(shape: Shape) {
    let signal = TestSignal::noise(BitDepth::Eight, 2, 64, 5);
    for quality in Quality::ALL {
        let mut resampler =
            AnyResampler::start(BitDepth::Eight, &signal, 2, 0, 0, 64, Some(quality)).unwrap();
        let (_, frames) = drive(&mut resampler, shape, &[10, 10, 10], &mut unity(), 2.0);
        assert_eq!(frames, 30);
        assert_eq!(resampler.window().position, 60);
        assert!(!resampler.is_exhausted());
    }
}

#[apply(every_shape)]
#[trace]
fn peeking_does_not_move(shape: Shape) {
    for quality in Quality::ALL {
        for depth in DEPTHS {
            let signal = TestSignal::noise(depth, 2, 64, 11);
            let mut resampler =
                AnyResampler::start(depth, &signal, 2, 5, 0, 64, Some(quality)).unwrap();
            let mut ramps = [VolumeRamp::new(0.8), VolumeRamp::new(0.6)];
            drive(&mut resampler, shape, &[7], &mut ramps, 0.6);

            let [left, right] = &ramps;
            let mut first = [0; 2];
            let mut second = [0; 2];
            resampler.current_sample(shape, &[left, right], &mut first);
            resampler.current_sample(shape, &[left, right], &mut second);
            assert_eq!(first, second);

            let before = resampler.window();
            let (next, frames) = drive(&mut resampler, shape, &[1], &mut ramps, 0.6);
            assert_eq!(frames, 1);
            assert_eq!(
                &first[..shape.output_channels()],
                next.as_slice(),
                "{quality:?} {depth:?}"
            );
            assert_ne!(before, resampler.window());
        }
    }
}

#[apply(every_shape)]
#[trace]
fn peeking_past_the_end_is_silent(shape: Shape) {
    let source = |_: usize, _: i64| 1000;
    let mut resampler =
        AnyResampler::start(BitDepth::Sixteen, &source, 2, 0, 0, 2, Some(Quality::Cubic)).unwrap();
    drive(&mut resampler, shape, &[4], &mut unity(), 1.0);
    let mut peeked = [7; 2];
    let [left, right] = unity();
    resampler.current_sample(shape, &[&left, &right], &mut peeked);
    assert_eq!(&peeked[..shape.output_channels()], &[0, 0][..shape.output_channels()]);
}

#[rstest]
fn aliasing_holds_the_sample_at_or_before_the_position(
    #[values(0.3, 0.5, 0.7, 1.0, 1.9)] delta: f64,
) {
    let signal = TestSignal::noise(BitDepth::Sixteen, 1, 256, 1);
    let mut resampler =
        Resampler::<Bits16>::start(&signal, 1, 0, 0, 256, Some(Quality::Aliasing)).unwrap();
    let mut out = [0; 100];
    resampler.resample_1_1(&mut out, &mut VolumeRamp::unity(), delta);

    let step = (delta * 65536.0).round() as i64;
    for (k, &sample) in out.iter().enumerate() {
        let index = (k as i64 * step >> 16) as usize;
        assert_eq!(sample, signal.channels[0][index] << 8, "frame {k}");
    }
}

#[rstest]
#[case(0, 1000, 0x8000)]
#[case(1000, 0, 0x4000)]
#[case(-32768, 32767, 0xffff)]
#[case(-5, 7, 1)]
fn linear_interpolates_between_neighbours(#[case] x0: i32, #[case] x1: i32, #[case] subpos: i32) {
    let signal = TestSignal::mono(&[x0, x1, x1]);
    let mut resampler =
        Resampler::<Bits16>::start(&signal, 1, 0, 0, 3, Some(Quality::Linear)).unwrap();
    let mut out = [0; 2];
    resampler.resample_1_1(&mut out, &mut VolumeRamp::unity(), subpos as f64 / 65536.0);

    assert_eq!(out[0], x0 << 8);
    let exact = (x0 as f64 + (x1 - x0) as f64 * subpos as f64 / 65536.0) * 256.0;
    assert!(
        (out[1] as f64 - exact).abs() <= 1.0,
        "{} vs {exact}",
        out[1]
    );
}

mod quickcheck_properties {
    use quickcheck::{quickcheck, TestResult};
    use tracker_resample::{Bits16, Quality, Resampler, VolumeRamp};

    use super::test_support::TestSignal;

    quickcheck! {
        fn linear_error_stays_below_one_unit(x0: i16, x1: i16, subpos: u16) -> TestResult {
            let signal = TestSignal::mono(&[x0 as i32, x1 as i32, x1 as i32]);
            let mut resampler =
                match Resampler::<Bits16>::start(&signal, 1, 0, 0, 3, Some(Quality::Linear)) {
                    Ok(resampler) => resampler,
                    Err(_) => return TestResult::error("allocation failed"),
                };
            let mut out = [0; 2];
            resampler.resample_1_1(&mut out, &mut VolumeRamp::unity(), subpos as f64 / 65536.0);

            let exact = (x0 as f64 + (x1 as f64 - x0 as f64) * subpos as f64 / 65536.0) * 256.0;
            TestResult::from_bool((out[1] as f64 - exact).abs() <= 1.0)
        }

        fn any_split_matches_one_call(first: u8, level: u8, delta: u16) -> TestResult {
            let delta = delta as f64 / 16384.0;
            if delta == 0.0 {
                return TestResult::discard();
            }
            let quality = Quality::from_level((level % 4) as i32);
            let signal = TestSignal::noise(tracker_resample::BitDepth::Sixteen, 1, 2048, 9);
            let run = |chunks: &[usize]| {
                let mut resampler =
                    Resampler::<Bits16>::start(&signal, 1, 8, 0, 2048, Some(quality)).ok()?;
                let mut out = Vec::new();
                for &chunk in chunks {
                    let mut block = vec![0; chunk];
                    let produced =
                        resampler.resample_1_1(&mut block, &mut VolumeRamp::new(0.9), delta);
                    out.extend_from_slice(&block[..produced]);
                }
                Some(out)
            };
            let first = first as usize % 64;
            TestResult::from_bool(run(&[64]) == run(&[first, 64 - first]))
        }
    }
}
