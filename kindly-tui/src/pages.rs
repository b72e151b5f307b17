use kindly_core::Route;

pub(crate) fn page_title(route: Route) -> &'static str {
    match route {
        Route::Home => "Welcome to Kindly",
        Route::AboutUs => "About us",
        Route::Contact => "Contact",
        Route::Services => "Our services",
        Route::Offers => "All offers",
    }
}

pub(crate) fn page_body(route: Route) -> &'static str {
    match route {
        Route::Home => {
            "Kindly connects families with trusted carers for children, elderly relatives \
             and pets.\n\nOpen Services to filter providers by the kind of care you need, \
             or Offers to see everyone currently registered.\n\nPress Tab to move between pages."
        }
        Route::AboutUs => {
            "Kindly started as a student project with one goal: make it easy to find \
             reliable, caring people close to home.\n\nEvery provider creates an account \
             and lists the kinds of care they offer."
        }
        Route::Contact => {
            "E-mail: contact@kindly.mk\nPhone: +389 2 000 000\n\nWe answer within one working day."
        }
        Route::Services => {
            "Kindly specialises in care services focused on the health and everyday needs \
             of the whole family."
        }
        Route::Offers => "Every provider registered with Kindly.",
    }
}
