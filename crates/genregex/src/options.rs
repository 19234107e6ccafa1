//! # Compile Options

bitflags::bitflags! {
    /// Option bits passed to the engine at compile time.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CompileOptions: u32 {
        /// Case-insensitive matching.
        const CASELESS = 1 << 0;

        /// `^` and `$` match at line boundaries.
        const MULTILINE = 1 << 1;

        /// `.` also matches `\n`.
        const DOTALL = 1 << 2;

        /// Ignore whitespace and `#` comments in the pattern.
        const EXTENDED = 1 << 3;

        /// Swap greedy and lazy quantifiers.
        const UNGREEDY = 1 << 4;
    }
}

impl CompileOptions {
    /// The inline flag group equivalent to these options, e.g. `(?is)`.
    ///
    /// Empty when no options are set.
    pub fn inline_flags(self) -> String {
        let mut flags = String::new();
        for (bit, c) in [
            (Self::CASELESS, 'i'),
            (Self::MULTILINE, 'm'),
            (Self::DOTALL, 's'),
            (Self::EXTENDED, 'x'),
            (Self::UNGREEDY, 'U'),
        ] {
            if self.contains(bit) {
                flags.push(c);
            }
        }
        if flags.is_empty() {
            flags
        } else {
            format!("(?{flags})")
        }
    }
}
