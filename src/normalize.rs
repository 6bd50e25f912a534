//! Identifier normalization.
//!
//! Every cache read and write goes through [`normalize_identifier`], so
//! `KERNEL32.dll!CloseHandle`, `__imp_CloseHandle` and `_CloseHandle@4` all
//! share the `CloseHandle` entry. Case is preserved: Win32 names are
//! documented under their exact spelling.
//!
//! The leading `_` rule also hits the few real names that start with one
//! (`_lopen`, `_lread`, `_hwrite`): they become `lopen` and so on, and are
//! looked up under that name.

/// Normalize an import symbol name to the bare function name.
///
/// Applied in this order:
/// 1. trim whitespace
/// 2. drop a module prefix up to the first `!`
/// 3. drop an `__imp_` thunk prefix
/// 4. drop one leading `_`
/// 5. drop a trailing `@<digits>` stdcall suffix
///
/// ```rust
/// # use windoc::normalize_identifier;
/// assert_eq!(normalize_identifier("KERNEL32.dll!GetProcAddress"), "GetProcAddress");
/// assert_eq!(normalize_identifier("_GetProcAddress@8"), "GetProcAddress");
/// ```
pub fn normalize_identifier(raw: &str) -> String {
    let mut name = raw.trim();

    if let Some((_, rest)) = name.split_once('!') {
        name = rest.trim();
    }

    name = name.strip_prefix("__imp_").unwrap_or(name);
    name = name.strip_prefix('_').unwrap_or(name);

    if let Some((base, suffix)) = name.rsplit_once('@') {
        if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) {
            name = base;
        }
    }

    name.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn underscore_names_lose_their_underscore() {
        assert_eq!(normalize_identifier("_lopen"), "lopen");
        assert_eq!(normalize_identifier("KERNEL32.dll!_hwrite"), "hwrite");
    }

    #[test]
    fn bare_name_unchanged() {
        assert_eq!(normalize_identifier("CloseHandle"), "CloseHandle");
    }

    #[test]
    fn strips_module_prefix() {
        assert_eq!(normalize_identifier("Kernel32!CloseHandle"), "CloseHandle");
        assert_eq!(
            normalize_identifier("KERNEL32.dll! CloseHandle "),
            "CloseHandle"
        );
    }

    #[test]
    fn strips_import_thunk_prefix() {
        assert_eq!(normalize_identifier("__imp_CreateFileW"), "CreateFileW");
    }

    #[test]
    fn strips_stdcall_decoration() {
        assert_eq!(normalize_identifier("_Sleep@4"), "Sleep");
        assert_eq!(normalize_identifier("Sleep@4"), "Sleep");
    }

    #[test]
    fn keeps_non_numeric_at_suffix() {
        assert_eq!(normalize_identifier("Foo@bar"), "Foo@bar");
        assert_eq!(normalize_identifier("Foo@"), "Foo@");
    }

    #[test]
    fn preserves_case() {
        assert_eq!(normalize_identifier("closehandle"), "closehandle");
        assert_ne!(
            normalize_identifier("CloseHandle"),
            normalize_identifier("closehandle")
        );
    }

    #[test]
    fn combined_decorations() {
        assert_eq!(
            normalize_identifier("user32.dll!__imp_MessageBoxA"),
            "MessageBoxA"
        );
    }

    #[test]
    fn empty_and_whitespace() {
        assert_eq!(normalize_identifier(""), "");
        assert_eq!(normalize_identifier("   "), "");
        assert_eq!(normalize_identifier("mod!"), "");
    }
}
