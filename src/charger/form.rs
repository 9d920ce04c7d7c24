//! The fields shared by the charger creation and edit forms.

use maud::{Markup, html};

use crate::{
    charger::{Charger, SUPPORTED_BRANDS, list::station_select},
    html::{FORM_CHECKBOX_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    station::Station,
};

/// Render the station, name, power and brand inputs filled from `charger`.
pub(super) fn charger_fields(stations: &[Station], charger: &Charger) -> Markup {
    let selected_station = Some(charger.station_id.as_str()).filter(|id| !id.is_empty());

    html! {
        (station_select(stations, selected_station, "station_id"))

        div
        {
            label for="name" class=(FORM_LABEL_STYLE) { "Charger Name" }

            input
                id="name"
                type="text"
                name="name"
                placeholder="Charger Name"
                value=(charger.name)
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="power" class=(FORM_LABEL_STYLE) { "Power (kW)" }

            input
                id="power"
                type="number"
                name="power"
                min="0"
                step="any"
                placeholder="60"
                value=(charger.power)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        fieldset
        {
            legend class=(FORM_LABEL_STYLE) { "Supported Brands" }

            div class="flex flex-wrap gap-4"
            {
                @for brand in SUPPORTED_BRANDS {
                    label class="flex items-center gap-2 text-sm"
                    {
                        input
                            type="checkbox"
                            name="brands"
                            value=(brand)
                            checked[charger.supports(brand)]
                            class=(FORM_CHECKBOX_STYLE);

                        (brand)
                    }
                }
            }
        }
    }
}
