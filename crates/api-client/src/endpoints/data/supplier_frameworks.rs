//! A supplier's interest in a framework: declarations, financial checks,
//! agreement status and the framework-wide supplier listing

use super::DataApiClient;
use dm_api_core::envelope::{reshape, Envelope};
use dm_api_core::error::ApiResult;
use dm_api_core::request::QueryParams;
use serde_json::Value;

/// Extra detail to embed in a supplier framework record
///
/// Each flag is sent as `...=True` when set and left out otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct SupplierFrameworkDetails {
    /// Include technical ability certificates
    pub with_technical_ability_certificates: bool,
    /// Include lot question responses
    pub with_lot_questions_responses: bool,
    /// Include lot pricings
    pub with_lot_pricings: bool,
    /// Include Central Digital Platform supplier information
    pub with_cdp_supplier_information: bool,
}

impl SupplierFrameworkDetails {
    fn query(self) -> QueryParams {
        let only_if = |set: bool| set.then_some(true);
        QueryParams::new()
            .title_flag(
                "with_technical_ability_certificates",
                only_if(self.with_technical_ability_certificates),
            )
            .title_flag(
                "with_lot_questions_responses",
                only_if(self.with_lot_questions_responses),
            )
            .title_flag("with_lot_pricings", only_if(self.with_lot_pricings))
            .title_flag(
                "with_cdp_supplier_information",
                only_if(self.with_cdp_supplier_information),
            )
    }
}

/// Filters for [`DataApiClient::find_framework_suppliers`]
#[derive(Debug, Clone, Default)]
pub struct FindFrameworkSuppliers {
    /// Only suppliers that have (or have not) returned an agreement
    pub agreement_returned: Option<bool>,
    /// Comma-separated agreement statuses, sent as `status`
    pub statuses: Option<String>,
    /// Include declarations
    pub with_declarations: Option<bool>,
    /// Include financial viability risk assessments
    pub with_fvra: Option<bool>,
    /// Include technical ability certificates
    pub with_technical_ability_certificates: Option<bool>,
    /// Include lot question responses
    pub with_lot_questions_responses: Option<bool>,
    /// Include lot pricings
    pub with_lot_pricings: Option<bool>,
    /// Include Central Digital Platform supplier information
    pub with_cdp_supplier_information: Option<bool>,
}

impl FindFrameworkSuppliers {
    fn query(&self) -> QueryParams {
        QueryParams::new()
            .title_flag("agreement_returned", self.agreement_returned)
            .opt("status", self.statuses.as_deref())
            .flag("with_declarations", self.with_declarations)
            .flag("with_fvra", self.with_fvra)
            .flag(
                "with_technical_ability_certificates",
                self.with_technical_ability_certificates,
            )
            .flag("with_lot_questions_responses", self.with_lot_questions_responses)
            .flag("with_lot_pricings", self.with_lot_pricings)
            .flag("with_cdp_supplier_information", self.with_cdp_supplier_information)
    }
}

impl DataApiClient {
    /// GET /suppliers/{id}/frameworks/interest
    pub fn get_framework_interest(&self, supplier_id: u64) -> ApiResult<Value> {
        self.client
            .get(&format!("/suppliers/{supplier_id}/frameworks/interest"))
    }

    /// PUT /suppliers/{id}/frameworks/{framework}
    pub fn register_framework_interest(
        &self,
        supplier_id: u64,
        framework_slug: &str,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::new().updated_by(self.user(user)?);
        self.client
            .put(&supplier_framework_path(supplier_id, framework_slug), body)
    }

    /// GET /suppliers/{id}/frameworks
    pub fn get_supplier_frameworks(
        &self,
        supplier_id: u64,
        details: SupplierFrameworkDetails,
    ) -> ApiResult<Value> {
        self.client
            .get_with(&format!("/suppliers/{supplier_id}/frameworks"), details.query())
    }

    /// GET /suppliers/{id}/frameworks/{framework}
    pub fn get_supplier_framework_info(
        &self,
        supplier_id: u64,
        framework_slug: &str,
        details: SupplierFrameworkDetails,
    ) -> ApiResult<Value> {
        self.client.get_with(
            &supplier_framework_path(supplier_id, framework_slug),
            details.query(),
        )
    }

    /// The supplier's declaration, answered as `{"declaration": ...}`
    pub fn get_supplier_declaration(&self, supplier_id: u64, framework_slug: &str) -> ApiResult<Value> {
        let response = self.get_supplier_framework_info(
            supplier_id,
            framework_slug,
            SupplierFrameworkDetails::default(),
        )?;
        reshape(&response, "/frameworkInterest/declaration", "declaration")
    }

    /// Replace a declaration
    ///
    /// PUT /suppliers/{id}/frameworks/{framework}/declaration
    pub fn set_supplier_declaration(
        &self,
        supplier_id: u64,
        framework_slug: &str,
        declaration: Value,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::wrap("declaration", declaration).updated_by(self.user(user)?);
        self.client.put(
            &format!("{}/declaration", supplier_framework_path(supplier_id, framework_slug)),
            body,
        )
    }

    /// Merge answers into a declaration
    ///
    /// PATCH /suppliers/{id}/frameworks/{framework}/declaration
    pub fn update_supplier_declaration(
        &self,
        supplier_id: u64,
        framework_slug: &str,
        declaration: Value,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::wrap("declaration", declaration).updated_by(self.user(user)?);
        self.client.patch(
            &format!("{}/declaration", supplier_framework_path(supplier_id, framework_slug)),
            body,
        )
    }

    /// POST /suppliers/{id}/frameworks/{framework}/declaration
    pub fn remove_supplier_declaration(
        &self,
        supplier_id: u64,
        framework_slug: &str,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::new().updated_by(self.user(user)?);
        self.client.post(
            &format!("{}/declaration", supplier_framework_path(supplier_id, framework_slug)),
            body,
        )
    }

    /// The supplier's financial viability answers, as `{"fvra": ...}`
    pub fn get_supplier_fvra(&self, supplier_id: u64, framework_slug: &str) -> ApiResult<Value> {
        let response = self.get_supplier_framework_info(
            supplier_id,
            framework_slug,
            SupplierFrameworkDetails::default(),
        )?;
        reshape(&response, "/frameworkInterest/fvra", "fvra")
    }

    /// Freeze the financial viability result for an application
    ///
    /// POST /suppliers/{id}/frameworks/{framework}/set-fvra-result
    pub fn set_supplier_fvra_result(
        &self,
        supplier_id: u64,
        framework_slug: &str,
        fvra_route: &str,
        fvra_additional_declaration_answers: Value,
        fvra_results: Value,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let frozen = Envelope::new()
            .with("fvraRoute", fvra_route)
            .with("fvraAdditionalDeclarationAnswers", fvra_additional_declaration_answers)
            .with("fvraResults", fvra_results);
        let body = Envelope::wrap("fvraFrozenResult", frozen).updated_by(self.user(user)?);
        self.client.post(
            &format!("{}/set-fvra-result", supplier_framework_path(supplier_id, framework_slug)),
            body,
        )
    }

    /// PATCH /suppliers/{id}/frameworks/{framework}/fvra
    pub fn update_supplier_fvra(
        &self,
        supplier_id: u64,
        framework_slug: &str,
        fvra: Value,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::wrap("fvra", fvra).updated_by(self.user(user)?);
        self.client.patch(
            &format!("{}/fvra", supplier_framework_path(supplier_id, framework_slug)),
            body,
        )
    }

    /// Record whether the supplier is on the framework; `None` clears the result
    pub fn set_framework_result(
        &self,
        supplier_id: u64,
        framework_slug: &str,
        on_framework: Option<bool>,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let interest = Envelope::new().with("onFramework", on_framework);
        self.update_framework_interest(supplier_id, framework_slug, interest, user)
    }

    /// Allow or forbid reusing this declaration on later frameworks
    pub fn set_supplier_framework_allow_declaration_reuse(
        &self,
        supplier_id: u64,
        framework_slug: &str,
        allow: bool,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let interest = Envelope::new().with("allowDeclarationReuse", allow);
        self.update_framework_interest(supplier_id, framework_slug, interest, user)
    }

    /// Choose the framework whose declaration prefills this one
    pub fn set_supplier_framework_prefill_declaration(
        &self,
        supplier_id: u64,
        framework_slug: &str,
        prefill_declaration_from_framework_slug: Option<&str>,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let interest = Envelope::new().with(
            "prefillDeclarationFromFrameworkSlug",
            prefill_declaration_from_framework_slug,
        );
        self.update_framework_interest(supplier_id, framework_slug, interest, user)
    }

    /// Record that the supplier confirmed its company details for the application
    pub fn set_supplier_framework_application_company_details_confirmed(
        &self,
        supplier_id: u64,
        framework_slug: &str,
        confirmed: bool,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let interest = Envelope::new().with("applicationCompanyDetailsConfirmed", confirmed);
        self.update_framework_interest(supplier_id, framework_slug, interest, user)
    }

    /// Record which agreement version the supplier is signing
    pub fn set_supplier_framework_agreement_version(
        &self,
        supplier_id: u64,
        framework_slug: &str,
        agreement_version: &str,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let interest = Envelope::new().with("agreementVersion", agreement_version);
        self.update_framework_interest(supplier_id, framework_slug, interest, user)
    }

    /// Mark the framework agreement as returned
    pub fn register_framework_agreement_returned(
        &self,
        supplier_id: u64,
        framework_slug: &str,
        user: Option<&str>,
        uploader_user_id: Option<u64>,
    ) -> ApiResult<Value> {
        let mut interest = Envelope::new().with("agreementReturned", true);
        if let Some(uploader_user_id) = uploader_user_id {
            interest = interest.with(
                "agreementDetails",
                Envelope::new().with("uploaderUserId", uploader_user_id),
            );
        }
        self.update_framework_interest(supplier_id, framework_slug, interest, user)
    }

    /// Mark the framework agreement as not returned
    pub fn unset_framework_agreement_returned(
        &self,
        supplier_id: u64,
        framework_slug: &str,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let interest = Envelope::new().with("agreementReturned", false);
        self.update_framework_interest(supplier_id, framework_slug, interest, user)
    }

    /// Update the signer details held against the agreement
    pub fn update_supplier_framework_agreement_details(
        &self,
        supplier_id: u64,
        framework_slug: &str,
        agreement_details: Value,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let interest = Envelope::new().with("agreementDetails", agreement_details);
        self.update_framework_interest(supplier_id, framework_slug, interest, user)
    }

    /// Mark the framework agreement as countersigned
    pub fn register_framework_agreement_countersigned(
        &self,
        supplier_id: u64,
        framework_slug: &str,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let interest = Envelope::new().with("countersigned", true);
        self.update_framework_interest(supplier_id, framework_slug, interest, user)
    }

    /// PUT /suppliers/{id}/frameworks/{framework}/variation/{variation}
    pub fn agree_framework_variation(
        &self,
        supplier_id: u64,
        framework_slug: &str,
        variation_slug: &str,
        agreed_user_id: u64,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::wrap(
            "agreedVariations",
            Envelope::new().with("agreedUserId", agreed_user_id),
        )
        .updated_by(self.user(user)?);
        self.client.put(
            &format!(
                "{}/variation/{variation_slug}",
                supplier_framework_path(supplier_id, framework_slug)
            ),
            body,
        )
    }

    fn update_framework_interest(
        &self,
        supplier_id: u64,
        framework_slug: &str,
        interest: Envelope,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::wrap("frameworkInterest", interest).updated_by(self.user(user)?);
        self.client
            .post(&supplier_framework_path(supplier_id, framework_slug), body)
    }

    /// GET /frameworks/{framework}/suppliers
    pub fn find_framework_suppliers(
        &self,
        framework_slug: &str,
        filters: FindFrameworkSuppliers,
    ) -> ApiResult<Value> {
        self.client
            .get_with(&format!("/frameworks/{framework_slug}/suppliers"), filters.query())
    }

    /// Every supplier framework record matching `filters`, across pages
    pub fn find_framework_suppliers_iter(
        &self,
        framework_slug: &str,
        filters: FindFrameworkSuppliers,
    ) -> impl Iterator<Item = ApiResult<Value>> + '_ {
        self.client.pages(
            "supplierFrameworks",
            format!("/frameworks/{framework_slug}/suppliers"),
            filters.query(),
        )
    }

    /// GET /frameworks/{framework}/suppliers/{id}/applications/verify
    pub fn verify_supplier_framework_application(
        &self,
        framework_slug: &str,
        supplier_id: u64,
        lot_slug: Option<&str>,
    ) -> ApiResult<Value> {
        self.client.get_with(
            &format!("/frameworks/{framework_slug}/suppliers/{supplier_id}/applications/verify"),
            QueryParams::new().opt("lot", lot_slug),
        )
    }

    /// Move an application from one supplier account to another
    ///
    /// POST /frameworks/{framework}/migrate-application
    pub fn migrate_framework_application(
        &self,
        framework_slug: &str,
        from_supplier_id: u64,
        to_supplier_id: u64,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::new()
            .with("fromSupplierId", from_supplier_id)
            .with("toSupplierId", to_supplier_id)
            .updated_by(self.user(user)?);
        self.client.post(
            &format!("/frameworks/{framework_slug}/migrate-application"),
            body,
        )
    }
}

fn supplier_framework_path(supplier_id: u64, framework_slug: &str) -> String {
    format!("/suppliers/{supplier_id}/frameworks/{framework_slug}")
}

#[cfg(test)]
mod tests {
    use super::super::{ids, test_client};
    use super::*;
    use dm_api_core::error::ApiError;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[test]
    fn test_get_framework_interest() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/suppliers/123/frameworks/interest")
            .with_status(200)
            .with_body(r#"{"frameworks": ["g-cloud-15", "dos-23"]}"#)
            .create();

        let result = test_client(&server).get_framework_interest(123).unwrap();
        assert_eq!(result, json!({"frameworks": ["g-cloud-15", "dos-23"]}));
        mock.assert();
    }

    #[test]
    fn test_register_framework_interest() {
        let mut server = Server::new();
        let mock = server
            .mock("PUT", "/suppliers/123/frameworks/g-cloud-15")
            .match_body(Matcher::Json(json!({"updated_by": "g-15-user"})))
            .with_status(200)
            .with_body(r#"{"frameworkInterest": {"supplierId": 123, "frameworkId": 19}}"#)
            .create();

        test_client(&server)
            .register_framework_interest(123, "g-cloud-15", Some("g-15-user"))
            .unwrap();
        mock.assert();
    }

    #[test]
    fn test_supplier_framework_detail_flags_are_title_case() {
        let mut server = Server::new();
        let plain = server
            .mock("GET", "/suppliers/123/frameworks")
            .with_status(200)
            .with_body(r#"{"frameworkInterest": []}"#)
            .create();
        let with_pricings = server
            .mock("GET", "/suppliers/123/frameworks/g-cloud-7?with_lot_pricings=True")
            .with_status(200)
            .with_body(r#"{"frameworkInterest": {"onFramework": false}}"#)
            .create();

        let client = test_client(&server);
        client
            .get_supplier_frameworks(123, SupplierFrameworkDetails::default())
            .unwrap();
        let details = SupplierFrameworkDetails {
            with_lot_pricings: true,
            ..SupplierFrameworkDetails::default()
        };
        client.get_supplier_framework_info(123, "g-cloud-7", details).unwrap();
        plain.assert();
        with_pricings.assert();
    }

    #[test]
    fn test_get_supplier_declaration_and_fvra_are_reshaped() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/suppliers/123/frameworks/g-cloud-7")
            .with_status(200)
            .with_body(
                r#"{"frameworkInterest": {"declaration": {"question": "answer"}, "fvra": {"status": "pass"}}}"#,
            )
            .expect(2)
            .create();

        let client = test_client(&server);
        assert_eq!(
            client.get_supplier_declaration(123, "g-cloud-7").unwrap(),
            json!({"declaration": {"question": "answer"}})
        );
        assert_eq!(
            client.get_supplier_fvra(123, "g-cloud-7").unwrap(),
            json!({"fvra": {"status": "pass"}})
        );
    }

    #[test]
    fn test_get_supplier_declaration_missing_key_is_invalid_response() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/suppliers/123/frameworks/g-cloud-7")
            .with_status(200)
            .with_body(r#"{"frameworkInterest": {}}"#)
            .create();

        let err = test_client(&server)
            .get_supplier_declaration(123, "g-cloud-7")
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse { .. }));
    }

    #[test]
    fn test_set_and_update_supplier_declaration() {
        let body = json!({"updated_by": "user", "declaration": {"question": "answer"}});
        let mut server = Server::new();
        let put = server
            .mock("PUT", "/suppliers/123/frameworks/g-cloud-7/declaration")
            .match_body(Matcher::Json(body.clone()))
            .with_status(200)
            .with_body(r#"{"declaration": {"question": "answer"}}"#)
            .create();
        let patch = server
            .mock("PATCH", "/suppliers/123/frameworks/g-cloud-7/declaration")
            .match_body(Matcher::Json(body))
            .with_status(200)
            .with_body(r#"{"declaration": {"question": "answer"}}"#)
            .create();

        let client = test_client(&server);
        let declaration = json!({"question": "answer"});
        client
            .set_supplier_declaration(123, "g-cloud-7", declaration.clone(), Some("user"))
            .unwrap();
        client
            .update_supplier_declaration(123, "g-cloud-7", declaration, Some("user"))
            .unwrap();
        put.assert();
        patch.assert();
    }

    #[test]
    fn test_remove_supplier_declaration() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/suppliers/123/frameworks/g-cloud-7/declaration")
            .match_body(Matcher::Json(json!({"updated_by": "user"})))
            .with_status(200)
            .with_body(r#"{"supplierFramework": "serialized_object"}"#)
            .create();

        test_client(&server)
            .remove_supplier_declaration(123, "g-cloud-7", Some("user"))
            .unwrap();
        mock.assert();
    }

    #[test]
    fn test_set_supplier_fvra_result() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/suppliers/123/frameworks/g-cloud-7/set-fvra-result")
            .match_body(Matcher::Json(json!({
                "updated_by": "user",
                "fvraFrozenResult": {
                    "fvraRoute": "fvra_default",
                    "fvraAdditionalDeclarationAnswers": {"key": "value"},
                    "fvraResults": {"DUNS": "123456789", "FVRAStatus": "Pass"},
                },
            })))
            .with_status(200)
            .with_body(r#"{"fvra": {"status": "in_progress"}}"#)
            .create();

        test_client(&server)
            .set_supplier_fvra_result(
                123,
                "g-cloud-7",
                "fvra_default",
                json!({"key": "value"}),
                json!({"DUNS": "123456789", "FVRAStatus": "Pass"}),
                Some("user"),
            )
            .unwrap();
        mock.assert();
    }

    #[test]
    fn test_update_supplier_fvra() {
        let mut server = Server::new();
        let mock = server
            .mock("PATCH", "/suppliers/123/frameworks/g-cloud-7/fvra")
            .match_body(Matcher::Json(json!({"updated_by": "user", "fvra": {"question": "answer"}})))
            .with_status(200)
            .with_body(r#"{"fvra": {"question": "answer"}}"#)
            .create();

        test_client(&server)
            .update_supplier_fvra(123, "g-cloud-7", json!({"question": "answer"}), Some("user"))
            .unwrap();
        mock.assert();
    }

    #[test]
    fn test_framework_interest_updates() {
        let mut server = Server::new();
        let expected = [
            json!({"onFramework": true}),
            json!({"allowDeclarationReuse": true}),
            json!({"prefillDeclarationFromFrameworkSlug": "pyjamas"}),
            json!({"applicationCompanyDetailsConfirmed": true}),
            json!({"agreementVersion": "aegis"}),
            json!({"agreementReturned": true, "agreementDetails": {"uploaderUserId": 10}}),
            json!({"agreementReturned": true}),
            json!({"agreementReturned": false}),
            json!({"agreementDetails": {"signerName": "name"}}),
            json!({"countersigned": true}),
        ];
        let mocks: Vec<_> = expected
            .iter()
            .map(|interest| {
                server
                    .mock("POST", "/suppliers/123/frameworks/g-cloud-8")
                    .match_body(Matcher::Json(json!({
                        "frameworkInterest": interest,
                        "updated_by": "user",
                    })))
                    .with_status(200)
                    .with_body("{}")
                    .expect(1)
                    .create()
            })
            .collect();

        let client = test_client(&server);
        let (id, fw, user) = (123, "g-cloud-8", Some("user"));
        client.set_framework_result(id, fw, Some(true), user).unwrap();
        client.set_supplier_framework_allow_declaration_reuse(id, fw, true, user).unwrap();
        client
            .set_supplier_framework_prefill_declaration(id, fw, Some("pyjamas"), user)
            .unwrap();
        client
            .set_supplier_framework_application_company_details_confirmed(id, fw, true, user)
            .unwrap();
        client.set_supplier_framework_agreement_version(id, fw, "aegis", user).unwrap();
        client.register_framework_agreement_returned(id, fw, user, Some(10)).unwrap();
        client.register_framework_agreement_returned(id, fw, user, None).unwrap();
        client.unset_framework_agreement_returned(id, fw, user).unwrap();
        client
            .update_supplier_framework_agreement_details(id, fw, json!({"signerName": "name"}), user)
            .unwrap();
        client.register_framework_agreement_countersigned(id, fw, user).unwrap();

        for mock in mocks {
            mock.assert();
        }
    }

    #[test]
    fn test_agree_framework_variation() {
        let mut server = Server::new();
        let mock = server
            .mock("PUT", "/suppliers/321/frameworks/g-cloud-99/variation/banana-split")
            .match_body(Matcher::Json(json!({
                "agreedVariations": {"agreedUserId": 314},
                "updated_by": "someuser",
            })))
            .with_status(200)
            .with_body(r#"{"agreedVariations": {"agreedUserId": 314}}"#)
            .create();

        test_client(&server)
            .agree_framework_variation(321, "g-cloud-99", "banana-split", 314, Some("someuser"))
            .unwrap();
        mock.assert();
    }

    #[test]
    fn test_find_framework_suppliers_flag_spellings() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/frameworks/g-cloud-7/suppliers")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("agreement_returned".into(), "True".into()),
                Matcher::UrlEncoded("status".into(), "signed,on-hold".into()),
                Matcher::UrlEncoded("with_declarations".into(), "false".into()),
                Matcher::UrlEncoded("with_fvra".into(), "false".into()),
                Matcher::UrlEncoded("with_technical_ability_certificates".into(), "true".into()),
                Matcher::UrlEncoded("with_cdp_supplier_information".into(), "true".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"supplierFrameworks": []}"#)
            .create();

        let filters = FindFrameworkSuppliers {
            agreement_returned: Some(true),
            statuses: Some("signed,on-hold".into()),
            with_declarations: Some(false),
            with_fvra: Some(false),
            with_technical_ability_certificates: Some(true),
            with_cdp_supplier_information: Some(true),
            ..FindFrameworkSuppliers::default()
        };
        test_client(&server)
            .find_framework_suppliers("g-cloud-7", filters)
            .unwrap();
        mock.assert();
    }

    #[test]
    fn test_find_framework_suppliers_iter() {
        let mut server = Server::new();
        let _mocks = super::super::mock_two_pages(
            &mut server,
            "/frameworks/g-cloud-8/suppliers",
            "supplierFrameworks",
        );

        let client = test_client(&server);
        let records = client.find_framework_suppliers_iter("g-cloud-8", FindFrameworkSuppliers::default());
        assert_eq!(ids(records), vec![1, 2, 3]);
    }

    #[test]
    fn test_verify_supplier_framework_application() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/frameworks/g-things-88/suppliers/1234/applications/verify?lot=g-thing")
            .with_status(200)
            .with_body(r#"{"applicationStatus": "result"}"#)
            .create();

        test_client(&server)
            .verify_supplier_framework_application("g-things-88", 1234, Some("g-thing"))
            .unwrap();
        mock.assert();
    }

    #[test]
    fn test_migrate_framework_application() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/frameworks/g-things-88/migrate-application")
            .match_body(Matcher::Json(json!({
                "fromSupplierId": 1234,
                "toSupplierId": 4567,
                "updated_by": "user",
            })))
            .with_status(200)
            .with_body(r#"{"message": "done"}"#)
            .create();

        test_client(&server)
            .migrate_framework_application("g-things-88", 1234, 4567, Some("user"))
            .unwrap();
        mock.assert();
    }
}
