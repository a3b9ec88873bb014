//! Fixed instruction templates and the part lists sent for each route.
//!
//! The templates are Indonesian because downstream clients parse the field
//! labels they request (`"toko":`, `HPP per unit:` and so on).

use crate::llm::Part;

pub const OCR_TEMPLATE: &str = r#"Kamu adalah AI OCR yang sangat akurat.
Baca isi struk pada gambar dan kembalikan hasil dalam FORMAT LIST SEDERHANA seperti berikut:

"toko":
"tanggal":
"items":
"nama":
"jumlah":
"harga_satuan":
"total":
"total_bayar":

Aturan:
- Jangan gunakan JSON atau {} atau [].
- Hanya isi nilai setelah tanda titik dua.
- Jika ada beberapa item, tuliskan semuanya dalam bagian "items" dengan baris baru.
- Jika jumlah tidak ada di struk, isi jumlah = 1.
- Gunakan angka tanpa koma atau simbol (contoh: 14000).
- Bersihkan nama item agar mudah dibaca.
- Jangan menambahkan kalimat penjelas di luar format list tersebut."#;

pub const HPP_TEMPLATE: &str = r#"Kamu adalah AI HPP Calculator untuk UMKM. Tugasmu adalah menghitung HPP (Harga Pokok Produksi)
dan memberikan rekomendasi harga jual berdasarkan margin 25% sampai 50%.

Input yang diberikan user selalu memiliki format:

nama produk = ...

bahan:
- nama bahan = ...
- satuan = ...
- harga beli = ...

biaya operasional:
biaya tenaga kerja per hari atau per bulan = ...
biaya overhead per hari atau per bulan = ...

jumlah produk atau unit = ...

deskripsi tambahan = ...

Tugasmu:
1. Hitung total biaya bahan (jumlahkan semua harga beli).
2. Hitung biaya operasional per unit:
   operasional_per_unit = (tenaga_kerja + overhead) / jumlah_unit
3. Hitung HPP per unit:
   hpp = (total_bahan / jumlah_unit) + operasional_per_unit
4. Berikan rekomendasi harga jual dengan margin:
   • 25%
   • 30%
   • 40%
   • 50%
5. Tampilkan hasil secara jelas, rapi, dan mudah dibaca.
6. Jika deskripsi user menyebut target laba, variasi rasa, lokasi, atau situasi bisnis tertentu,
   sesuaikan saran harga.

Output yang harus kamu berikan:

HPP Summary:
- Total biaya bahan:
- Biaya operasional per unit:
- HPP per unit:

Rekomendasi Harga Jual:
- Margin 25%:
- Margin 30%:
- Margin 40%:
- Margin 50%:

Catatan tambahan (opsional):
• Saran singkat mengenai harga jual & strategi bisnis."#;

/// `[instruction, image]`
pub fn ocr_parts(mime_type: impl Into<String>, image: impl Into<Vec<u8>>) -> Vec<Part> {
    vec![Part::text(OCR_TEMPLATE), Part::image(mime_type, image)]
}

/// `[message]`, sent as-is.
pub fn chat_parts(message: impl Into<String>) -> Vec<Part> {
    vec![Part::text(message)]
}

/// `[instruction, user_input]`
pub fn hpp_parts(user_input: impl Into<String>) -> Vec<Part> {
    vec![Part::text(HPP_TEMPLATE), Part::text(user_input)]
}

/// True when the top-level type of a media type is `image`.
pub fn is_image_media_type(media_type: &str) -> bool {
    media_type
        .split('/')
        .next()
        .is_some_and(|top| top.trim().eq_ignore_ascii_case("image"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_ocr_parts_order() {
        let parts = ocr_parts("image/jpeg", vec![0xFF, 0xD8]);

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].as_text(), Some(OCR_TEMPLATE));
        assert_eq!(parts[1], Part::image("image/jpeg", vec![0xFF, 0xD8]));
    }

    #[test]
    fn test_chat_parts_have_no_template() {
        assert_eq!(chat_parts("hello"), vec![Part::text("hello")]);
    }

    #[test]
    fn test_hpp_template_is_constant() {
        let first = hpp_parts("nama produk = Kopi Susu");
        let second = hpp_parts("nama produk = Roti Bakar");

        assert_eq!(first[0], second[0]);
        assert_eq!(first[0].as_text(), Some(HPP_TEMPLATE));
        assert_eq!(first[1].as_text(), Some("nama produk = Kopi Susu"));
        assert_eq!(second[1].as_text(), Some("nama produk = Roti Bakar"));
    }

    #[test]
    fn test_ocr_template_rules() {
        assert!(OCR_TEMPLATE.contains("Jangan gunakan JSON"));
        assert!(OCR_TEMPLATE.contains("isi jumlah = 1"));
        for field in ["toko", "tanggal", "items", "harga_satuan", "total_bayar"] {
            assert!(OCR_TEMPLATE.contains(&format!("\"{}\":", field)));
        }
    }

    #[test]
    fn test_hpp_template_lists_every_margin() {
        for margin in [25, 30, 40, 50] {
            assert!(HPP_TEMPLATE.contains(&format!("Margin {}%:", margin)));
        }
        assert!(HPP_TEMPLATE.contains("(tenaga_kerja + overhead) / jumlah_unit"));
    }

    #[rstest]
    #[case("image/png", true)]
    #[case("image/jpeg", true)]
    // Media types are case-insensitive, so this accepts what a strict
    // lowercase comparison would reject.
    #[case("IMAGE/webp", true)]
    #[case("image", true)]
    #[case("text/plain", false)]
    #[case("application/pdf", false)]
    #[case("application/octet-stream", false)]
    #[case("imagex/png", false)]
    #[case("", false)]
    fn test_is_image_media_type(#[case] media_type: &str, #[case] expected: bool) {
        assert_eq!(is_image_media_type(media_type), expected);
    }
}
