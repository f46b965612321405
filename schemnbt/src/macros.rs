/// Build a [`Value`][`crate::Value`] from a JSON-like literal.
///
/// ```rust
/// use schemnbt::{nbt, Tag};
///
/// let v = nbt!({
///     "Width": 2i16,
///     "Palette": { "minecraft:air": 0, "minecraft:stone": 1 },
///     "BlockData": [B; 0, 1],
///     "Offset": [I; 0, 64, 0],
///     "Entities": [],
/// });
///
/// assert_eq!(v.get("Width").map(|w| w.tag()), Some(Tag::Short));
/// ```
///
/// * Compound keys are string literals.
/// * `[B; ..]`, `[I; ..]` and `[L; ..]` are byte, int and long arrays, as in
///   SNBT.
/// * Any other `[..]` is a list. Its element kind is that of the first
///   element, and the macro panics if the others differ. `[]` is an empty
///   list of `End`.
/// * Everything else is an expression converted with `Value::from`, so plain
///   integer literals are `Int` and float literals `Double`. Use a suffix for
///   other widths.
#[macro_export]
macro_rules! nbt {
    // List elements are split on top level commas. `$done` holds finished
    // elements, `$cur` the tokens of the one being read.
    (@list [$($done:expr,)*] ()) => {
        ::std::vec![$($done,)*]
    };
    (@list [$($done:expr,)*] ($($cur:tt)+)) => {
        $crate::nbt!(@list [$($done,)* $crate::nbt!($($cur)+),] ())
    };
    (@list [$($done:expr,)*] ($($cur:tt)+) , $($rest:tt)*) => {
        $crate::nbt!(@list [$($done,)* $crate::nbt!($($cur)+),] () $($rest)*)
    };
    (@list [$($done:expr,)*] ($($cur:tt)*) $next:tt $($rest:tt)*) => {
        $crate::nbt!(@list [$($done,)*] ($($cur)* $next) $($rest)*)
    };

    // Same for compound entries, inserting each one into `$map` as soon as it
    // is complete.
    (@compound $map:ident ()) => {};
    (@compound $map:ident ($key:literal : $($value:tt)+)) => {
        let _ = $map.insert(::std::string::String::from($key), $crate::nbt!($($value)+));
    };
    (@compound $map:ident ($key:literal : $($value:tt)+) , $($rest:tt)*) => {
        let _ = $map.insert(::std::string::String::from($key), $crate::nbt!($($value)+));
        $crate::nbt!(@compound $map () $($rest)*);
    };
    (@compound $map:ident ($($cur:tt)*) $next:tt $($rest:tt)*) => {
        $crate::nbt!(@compound $map ($($cur)* $next) $($rest)*);
    };

    ([B; $($elem:expr),* $(,)?]) => {
        $crate::Value::ByteArray(::std::vec![$($elem),*])
    };
    ([I; $($elem:expr),* $(,)?]) => {
        $crate::Value::IntArray(::std::vec![$($elem),*])
    };
    ([L; $($elem:expr),* $(,)?]) => {
        $crate::Value::LongArray(::std::vec![$($elem),*])
    };

    ([$($elems:tt)*]) => {
        $crate::Value::List(
            $crate::List::from_values($crate::nbt!(@list [] () $($elems)*))
                .expect("nbt! list elements must all be the same kind"),
        )
    };

    ({$($entries:tt)*}) => {
        $crate::Value::Compound({
            #[allow(unused_mut)]
            let mut map = $crate::Compound::new();
            $crate::nbt!(@compound map () $($entries)*);
            map
        })
    };

    ($value:expr) => {
        $crate::Value::from($value)
    };
}
