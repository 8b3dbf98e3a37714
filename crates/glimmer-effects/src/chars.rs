//! Character constants for the effects.

/// Glyphs the rain draws from: katakana, digits and upper-case Latin.
pub const RAIN_GLYPHS: &[char] = &[
    'ア', 'ァ', 'カ', 'サ', 'タ', 'ナ', 'ハ', 'マ', 'ヤ', 'ャ', 'ラ', 'ワ', 'ガ', 'ザ', 'ダ', 'バ',
    'パ', 'イ', 'ィ', 'キ', 'シ', 'チ', 'ニ', 'ヒ', 'ミ', 'リ', 'ヰ', 'ギ', 'ジ', 'ヂ', 'ビ', 'ピ',
    'ウ', 'ゥ', 'ク', 'ス', 'ツ', 'ヌ', 'フ', 'ム', 'ユ', 'ュ', 'ル', 'グ', 'ズ', 'ブ', 'ヅ', 'プ',
    'エ', 'ェ', 'ケ', 'セ', 'テ', 'ネ', 'ヘ', 'メ', 'レ', 'ヱ', 'ゲ', 'ゼ', 'デ', 'ベ', 'ペ', 'オ',
    'ォ', 'コ', 'ソ', 'ト', 'ノ', 'ホ', 'モ', 'ヨ', 'ョ', 'ロ', 'ヲ', 'ゴ', 'ゾ', 'ド', 'ボ', 'ポ',
    'ヴ', 'ッ', 'ン', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E',
    'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X',
    'Y', 'Z',
];

/// Particle glyph for small radii.
pub const PARTICLE_SMALL: char = '•';

/// Particle glyph for large radii.
pub const PARTICLE_LARGE: char = '●';

/// Connection line glyphs: horizontal, vertical, falling, rising.
pub const LINE_GLYPHS: [char; 4] = ['─', '│', '╲', '╱'];

/// Theme toggle icons.
pub const MOON: char = '☾';
pub const SUN: char = '☀';

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rain_glyphs_are_unique() {
        let mut seen = RAIN_GLYPHS.to_vec();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), RAIN_GLYPHS.len());
    }
}
