use crate::affordability::{AffordabilityInput, AffordabilityResult};
use crate::display::{format_decimal_with_commas, format_percent, format_rupiah};

/// Name used when the borrower left the name field blank.
pub const DEFAULT_BORROWER_NAME: &str = "Nasabah";

/// Resolve the name the advisor addresses the borrower by.
pub fn borrower_display_name(input: &AffordabilityInput) -> &str {
    input
        .borrower_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_BORROWER_NAME)
}

/// System instructions for the banker persona, carrying the borrower's
/// profile and the computed affordability figures.
pub fn build_banker_context(input: &AffordabilityInput, result: &AffordabilityResult) -> String {
    let p = &input.profile;
    let t = &input.thresholds;
    format!(
        "Anda adalah **Personal Banking Officer** berpengalaman yang membantu nasabah mengambil keputusan KPR secara bijak.
Berikan nasihat praktis dan bertanggung jawab, tekankan manajemen risiko dan syarat pengajuan KPR.

Profil nasabah:
- Nama: {name}
- Gaji bersih bulanan: {income}
- Total pengeluaran bulanan: {expenses}
- Harga properti: {price}
- DP: {dp}
- Tenor: {term} tahun
- Bunga: {rate}% p.a.
- Batas DSR kebijakan: {max_dsr}
- Batas LTV kebijakan: {max_ltv}

Perhitungan awal:
- Kebutuhan pinjaman: {loan}
- Perkiraan angsuran/bulan: {payment}
- DSR terpakai (estimasi): {dsr}
- LTV: {ltv}
- Estimasi maksimum pokok pinjaman sesuai DSR: {max_principal}
- DP minimum agar DSR dan LTV terpenuhi: {required_dp}

Instruksi gaya & batasan:
- Gunakan bahasa Indonesia yang ramah, sopan, singkat, dan jelas, sebut nama nasabah.
- Tawarkan langkah konkret (contoh: tambah DP sekian, pilih tenor sekian, opsi fixed-floating).
- Jangan menjanjikan persetujuan kredit.
- Jelaskan bahwa histori SLIK OJK sangat berpengaruh dalam proses pengajuan KPR.
- Jelaskan opsi (fixed vs floating, take over KPR, KPR syariah, penalti pelunasan, biaya-biaya).
- Sarankan pengumpulan dokumen dan pengecekan skor kredit bila relevan.
- Jika data kurang, ajukan pertanyaan klarifikasi satu per satu.",
        name = borrower_display_name(input),
        income = format_rupiah(p.net_monthly_income),
        expenses = format_rupiah(p.monthly_expenses),
        price = format_rupiah(p.property_price),
        dp = format_rupiah(p.down_payment),
        term = p.term_years,
        rate = format_decimal_with_commas(p.annual_interest_rate_pct),
        max_dsr = format_percent(t.max_dsr),
        max_ltv = format_percent(t.max_ltv),
        loan = format_rupiah(result.loan_need),
        payment = format_rupiah(result.estimated_monthly_payment),
        dsr = format_percent(result.dsr_used),
        ltv = format_percent(result.loan_to_value),
        max_principal = format_rupiah(result.max_principal_under_dsr),
        required_dp = format_rupiah(result.required_down_payment),
    )
}

/// Early-eligibility notice, present only when a check fails.
pub fn compliance_notice(result: &AffordabilityResult) -> Option<String> {
    if result.eligible() {
        return None;
    }
    let mark = |ok: bool| if ok { "✅" } else { "❌" };
    Some(format!(
        "⚠️ Catatan kelayakan awal:\n- DSR terpenuhi: {}\n- LTV dalam batas: {}",
        mark(result.dsr_compliant),
        mark(result.ltv_compliant),
    ))
}
