//! Historical-site filter.

use heritage_shared::HeritageSite;

/// Records that have coordinates and whose type text contains `tag`.
///
/// The result borrows from `sites`, keeping input order.
pub fn filter_historical<'a>(sites: &'a [HeritageSite], tag: &str) -> Vec<&'a HeritageSite> {
    sites
        .iter()
        .filter(|site| site.coordinates.is_some() && site.has_type_tag(tag))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use heritage_shared::Coordinates;

    const TAG: &str = "lịch sử";

    fn site(name: &str, types: &str, located: bool) -> HeritageSite {
        HeritageSite {
            name: name.into(),
            types: types.into(),
            coordinates: located.then(|| Coordinates {
                latitude: "21.0307°B".into(),
                longitude: "105.852°Đ".into(),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn keeps_located_historical_sites() {
        let sites = vec![site("Hoàng thành Thăng Long", "Di tích lịch sử", true)];
        let kept = filter_historical(&sites, TAG);
        assert_eq!(kept.len(), 1);
        assert!(std::ptr::eq(kept[0], &sites[0]));
    }

    #[test]
    fn excludes_other_types() {
        let sites = vec![site("Vịnh Hạ Long", "Danh lam thắng cảnh", true)];
        assert!(filter_historical(&sites, TAG).is_empty());
    }

    #[test]
    fn excludes_sites_without_coordinates() {
        let sites = vec![site("Đền Hùng", "Di tích lịch sử", false)];
        assert!(filter_historical(&sites, TAG).is_empty());
    }

    #[test]
    fn tag_match_is_case_sensitive_substring() {
        let sites = vec![
            site("A", "Di tích lịch sử - văn hóa", true),
            site("B", "Di tích Lịch sử", true),
            site("C", "Lịch sử", true),
        ];
        let names: Vec<&str> = filter_historical(&sites, TAG)
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["A"]);
    }

    #[test]
    fn preserves_input_order() {
        let sites = vec![
            site("1", "Di tích lịch sử", true),
            site("2", "Kiến trúc nghệ thuật", true),
            site("3", "Di tích lịch sử", true),
        ];
        let names: Vec<&str> = filter_historical(&sites, TAG)
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["1", "3"]);
    }
}
