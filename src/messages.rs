//! User-facing message templates shown by the storefront

/// Shown when an uploaded photo exceeds the size limit
pub const IMAGE_TOO_LARGE: &str = "L'image est trop volumineuse (max 5MB)";

/// Shown when an uploaded photo is neither JPEG nor PNG
pub const IMAGE_UNSUPPORTED_FORMAT: &str = "Format d'image non supporté (JPG ou PNG uniquement)";

/// Shown when an uploaded photo has no content
pub const IMAGE_EMPTY: &str = "L'image est vide";

/// Advisory attached to every simulated try-on result
pub const DEMO_MODE_NOTICE: &str = "Mode démo activé - Configuration requise pour l'API Banana";

/// Shown when a catalog search matches nothing
pub const EMPTY_CATALOG: &str = "Aucune box ne correspond à vos critères";

/// Toast body after adding a box to the cart
pub fn added_to_cart(box_name: &str) -> String {
    format!("{} a été ajouté à votre panier.", box_name)
}
