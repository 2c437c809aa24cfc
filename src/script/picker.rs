//! 言い回しの選択を抽象化する。
//!
//! 本番では OS シードの `StdRng` を使い、テストでは決定的な実装を差し込む。

use rand::{Rng, SeedableRng, rngs::StdRng};

/// 同義の言い回し候補から1つを選ぶ。
pub trait PhrasePicker {
    /// `0..len` の範囲のインデックスを返す。`len` は常に1以上。
    fn pick_index(&mut self, len: usize) -> usize;

    /// 候補から1つ選ぶ。候補が空なら空文字列。
    fn choose<'a>(&mut self, variants: &[&'a str]) -> &'a str {
        match variants.len() {
            0 => "",
            len => variants[self.pick_index(len).min(len - 1)],
        }
    }
}

/// 一様乱数で選ぶピッカー。
#[derive(Debug, Clone)]
pub struct RandomPicker<R = StdRng> {
    rng: R,
}

impl RandomPicker<StdRng> {
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// 再現用の固定シード。
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomPicker<R> {
    /// 任意の乱数源を使う。
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> PhrasePicker for RandomPicker<R> {
    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

/// 常に先頭の候補を選ぶ。出力を固定したいテストやベンチ用。
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstVariant;

impl PhrasePicker for FirstVariant {
    fn pick_index(&mut self, _len: usize) -> usize {
        0
    }
}
